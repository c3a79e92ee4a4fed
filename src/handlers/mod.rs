pub mod health;
pub mod patterns;
pub mod scan;
pub mod universe;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/scan",
            get(scan::get_scan_status)
                .post(scan::start_scan)
                .delete(scan::cancel_scan),
        )
        .route("/patterns", get(patterns::get_patterns))
        .route("/universe", get(universe::get_universe))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::business_logic::config::PatternConfig;
    use crate::errors::DataSourceError;
    use crate::services::aggregator::tests::{quiet_social, FixedSignals, FixedSocial};
    use crate::services::aggregator::SignalAggregator;
    use crate::services::cancel::CancelToken;
    use crate::services::ranker::BreakoutRanker;
    use crate::services::scanner::ScanService;
    use crate::services::sources::{StaticUniverse, SymbolUniverse};
    use crate::services::timeframes::tests::{cup_series, StubCandles};
    use crate::services::timeframes::MultiTimeframeAnalyzer;

    struct OfflineUniverse;

    #[async_trait]
    impl SymbolUniverse for OfflineUniverse {
        async fn symbols(&self, _cancel: &CancelToken) -> Result<Vec<String>, DataSourceError> {
            Err(DataSourceError::CircuitOpen)
        }
    }

    fn state(universe: Arc<dyn SymbolUniverse>, fetch_delay: Option<Duration>) -> AppState {
        let candles = StubCandles {
            series: HashMap::from([(86_400, cup_series(0, 86_400))]),
            delay: fetch_delay,
            ..StubCandles::default()
        };
        let analyzer = Arc::new(MultiTimeframeAnalyzer::new(
            Arc::new(candles),
            PatternConfig::default(),
            300,
        ));
        let aggregator = SignalAggregator::new(
            Arc::new(FixedSignals::default()),
            Arc::new(FixedSocial(quiet_social())),
        );
        let ranker = Arc::new(BreakoutRanker::new(analyzer.clone(), aggregator, 10));
        let scanner = Arc::new(ScanService::new(ranker, universe.clone()));

        AppState {
            scanner,
            analyzer,
            universe,
        }
    }

    fn static_universe() -> Arc<dyn SymbolUniverse> {
        Arc::new(StaticUniverse::new(vec![
            "BTC-USD".to_string(),
            "ETH-USD".to_string(),
        ]))
    }

    async fn serve(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn wait_for_idle(client: &reqwest::Client, base: &str) -> Value {
        for _ in 0..500 {
            let body: Value = client
                .get(format!("{base}/scan"))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            if body["state"] == "idle" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("scan did not finish");
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let base = serve(state(static_universe(), None)).await;

        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn scan_lifecycle_over_http() {
        let base = serve(state(static_universe(), None)).await;
        let client = reqwest::Client::new();

        let idle: Value = client
            .get(format!("{base}/scan"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(idle["state"], "idle");
        assert!(idle["last_outcome"].is_null());

        let started = client.post(format!("{base}/scan")).send().await.unwrap();
        assert_eq!(started.status(), reqwest::StatusCode::ACCEPTED);

        let done = wait_for_idle(&client, &base).await;
        assert_eq!(done["last_outcome"], "completed");
        assert_eq!(done["symbols_scanned"], 2);
        let candidates = done["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["patterns"]["cup_and_handle"], true);
        assert_eq!(candidates[0]["patterns"]["ascending_triangle"], false);
    }

    #[tokio::test]
    async fn concurrent_scan_request_conflicts() {
        let base = serve(state(static_universe(), Some(Duration::from_secs(30)))).await;
        let client = reqwest::Client::new();

        let first = client.post(format!("{base}/scan")).send().await.unwrap();
        assert_eq!(first.status(), reqwest::StatusCode::ACCEPTED);

        let second = client.post(format!("{base}/scan")).send().await.unwrap();
        assert_eq!(second.status(), reqwest::StatusCode::CONFLICT);
        let body: Value = second.json().await.unwrap();
        assert_eq!(body["message"], "a scan is already in progress");

        let cancelled = client.delete(format!("{base}/scan")).send().await.unwrap();
        assert_eq!(cancelled.status(), reqwest::StatusCode::ACCEPTED);

        let done = wait_for_idle(&client, &base).await;
        assert_eq!(done["last_outcome"], "cancelled");
    }

    #[tokio::test]
    async fn cancel_when_idle_conflicts() {
        let base = serve(state(static_universe(), None)).await;

        let response = reqwest::Client::new()
            .delete(format!("{base}/scan"))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn patterns_report_covers_three_timeframes() {
        let base = serve(state(static_universe(), None)).await;

        let body: Value = reqwest::get(format!("{base}/patterns?symbol=BTC-USD"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["symbol"], "BTC-USD");
        assert_eq!(body["hourly"]["patterns"].as_array().unwrap().len(), 0);
        assert_eq!(body["daily"]["patterns"][0]["pattern"], "cup_and_handle");
        assert_eq!(body["daily"]["patterns"][0]["timeframe"], "1d");
        assert_eq!(body["daily"]["window"]["end"], 29 * 86_400);
    }

    #[tokio::test]
    async fn malformed_symbol_is_rejected() {
        let base = serve(state(static_universe(), None)).await;

        let response = reqwest::get(format!("{base}/patterns?symbol=btcusd"))
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().contains("BASE-QUOTE"));
    }

    #[tokio::test]
    async fn universe_lists_configured_symbols() {
        let base = serve(state(static_universe(), None)).await;

        let body: Value = reqwest::get(format!("{base}/universe"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["symbols"], serde_json::json!(["BTC-USD", "ETH-USD"]));
    }

    #[tokio::test]
    async fn universe_failure_is_a_bad_gateway() {
        let base = serve(state(Arc::new(OfflineUniverse), None)).await;

        let response = reqwest::get(format!("{base}/universe")).await.unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_GATEWAY);
    }
}
