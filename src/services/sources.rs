use async_trait::async_trait;

use crate::errors::DataSourceError;
use crate::models::candle::Candle;
use crate::services::cancel::CancelToken;

/// Historical candles for one symbol and granularity, ordered ascending by time
#[async_trait]
pub trait CandleSource: Send + Sync {
    async fn fetch_candles(
        &self,
        symbol: &str,
        granularity_secs: u32,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, DataSourceError>;
}

/// The set of symbols a scan covers
#[async_trait]
pub trait SymbolUniverse: Send + Sync {
    async fn symbols(&self, cancel: &CancelToken) -> Result<Vec<String>, DataSourceError>;
}

/// Fixed symbol list configured at startup
#[derive(Debug, Clone)]
pub struct StaticUniverse {
    symbols: Vec<String>,
}

impl StaticUniverse {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }
}

#[async_trait]
impl SymbolUniverse for StaticUniverse {
    async fn symbols(&self, _cancel: &CancelToken) -> Result<Vec<String>, DataSourceError> {
        Ok(self.symbols.clone())
    }
}
