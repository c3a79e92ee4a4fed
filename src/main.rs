mod business_logic;
mod config;
mod errors;
mod handlers;
mod models;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::business_logic::config::PatternConfig;
use crate::config::AppConfig;
use crate::services::aggregator::SignalAggregator;
use crate::services::coinbase::CoinbaseClient;
use crate::services::ranker::BreakoutRanker;
use crate::services::scanner::ScanService;
use crate::services::signals::SimulatedSignals;
use crate::services::social::SimulatedSocialSource;
use crate::services::sources::{StaticUniverse, SymbolUniverse};
use crate::services::timeframes::MultiTimeframeAnalyzer;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::scan::start_scan,
        handlers::scan::get_scan_status,
        handlers::scan::cancel_scan,
        handlers::patterns::get_patterns,
        handlers::universe::get_universe
    ),
    components(schemas(
        errors::ErrorResponse,
        models::health::HealthResponse,
        models::scan::ScanStatusResponse,
        models::scan::ScanState,
        models::scan::ScanOutcome,
        models::pattern::MultiTimeframeReport,
        models::pattern::TimeframeReport,
        models::pattern::PatternResult,
        models::pattern::PatternFlags,
        models::analysis::DetailedPatternAnalysis,
        models::social::SocialMetrics,
        models::universe::UniverseResponse
    ))
)]
struct ApiDoc;

/// Stdout always; a daily rolling file too when a log directory is configured
fn init_tracing(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "breakout_scanner=info".into());

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "breakout-scanner.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    let client = Arc::new(
        CoinbaseClient::new(config.fetch.clone()).context("failed to build exchange client")?,
    );

    let universe: Arc<dyn SymbolUniverse> = match &config.symbols {
        Some(symbols) => {
            tracing::info!("Using static universe of {} symbols", symbols.len());
            Arc::new(StaticUniverse::new(symbols.clone()))
        }
        None => client.clone(),
    };

    let analyzer = Arc::new(MultiTimeframeAnalyzer::new(
        client,
        PatternConfig::default(),
        config.candle_limit,
    ));
    let aggregator = match config.seed {
        Some(seed) => {
            tracing::info!("Simulated feeds seeded with {}", seed);
            SignalAggregator::new(
                Arc::new(SimulatedSignals::seeded(seed)),
                Arc::new(SimulatedSocialSource::seeded(seed)),
            )
        }
        None => SignalAggregator::new(
            Arc::new(SimulatedSignals::new()),
            Arc::new(SimulatedSocialSource::new()),
        ),
    };
    let ranker = Arc::new(BreakoutRanker::new(
        analyzer.clone(),
        aggregator,
        config.top_n,
    ));
    let scanner = Arc::new(ScanService::new(ranker, universe.clone()));

    let state = AppState {
        scanner,
        analyzer,
        universe,
    };

    let app = handlers::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", config.bind_addr);
    tracing::info!("Exchange API: {}", config.fetch.api_url);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
