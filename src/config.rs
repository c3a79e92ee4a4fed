use std::time::Duration;

use anyhow::Context;

/// Market-data client tuning
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Exchange REST base URL
    pub api_url: String,
    /// Minimum spacing between requests (token refill period)
    pub min_request_interval: Duration,
    /// Requests that may go out back to back before spacing applies
    pub burst: u32,
    /// Retries on 429 before giving up
    pub max_retries: u32,
    /// First 429 backoff; doubles per retry
    pub base_backoff: Duration,
    /// Ceiling for a single backoff
    pub max_backoff: Duration,
    /// Consecutive failed requests that open the circuit
    pub breaker_threshold: u32,
    /// How long an open circuit rejects requests
    pub breaker_cooldown: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.exchange.coinbase.com".to_string(),
            min_request_interval: Duration::from_millis(300),
            burst: 1,
            max_retries: 5,
            base_backoff: Duration::from_millis(1_000),
            max_backoff: Duration::from_secs(16),
            breaker_threshold: 5,
            breaker_cooldown: Duration::from_secs(30),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Candles requested per timeframe
    pub candle_limit: usize,
    /// Candidates kept after ranking
    pub top_n: usize,
    /// Fixed universe instead of the exchange product listing
    pub symbols: Option<Vec<String>>,
    /// Directory for rolling log files
    pub log_dir: Option<String>,
    /// Fixed seed for the simulated signal and social feeds
    pub seed: Option<u64>,
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            candle_limit: 300,
            top_n: 10,
            symbols: None,
            log_dir: None,
            seed: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `SCANNER_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(addr) = lookup("SCANNER_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(url) = lookup("SCANNER_API_URL") {
            config.fetch.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(limit) = lookup("SCANNER_CANDLE_LIMIT") {
            config.candle_limit = limit
                .parse()
                .with_context(|| format!("invalid SCANNER_CANDLE_LIMIT: {limit}"))?;
        }
        if let Some(top_n) = lookup("SCANNER_TOP_N") {
            config.top_n = top_n
                .parse()
                .with_context(|| format!("invalid SCANNER_TOP_N: {top_n}"))?;
        }
        if let Some(symbols) = lookup("SCANNER_SYMBOLS") {
            let symbols: Vec<String> = symbols
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                config.symbols = Some(symbols);
            }
        }
        config.log_dir = lookup("SCANNER_LOG_DIR");
        if let Some(seed) = lookup("SCANNER_SEED") {
            config.seed = Some(
                seed.parse()
                    .with_context(|| format!("invalid SCANNER_SEED: {seed}"))?,
            );
        }

        Ok(config)
    }
}
