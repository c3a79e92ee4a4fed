use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::FetchConfig;
use crate::errors::DataSourceError;
use crate::models::candle::{decode_series, Candle};
use crate::models::universe::{tradable_usd_symbols, Product};
use crate::services::cancel::CancelToken;
use crate::services::rate_limiter::RateLimiter;
use crate::services::sources::{CandleSource, SymbolUniverse};

/// Opens after a run of failed requests and rejects calls until the cooldown passes
#[derive(Debug, Default)]
struct CircuitBreaker {
    consecutive_failures: u32,
    open_until: Option<Instant>,
}

impl CircuitBreaker {
    fn check(&mut self, now: Instant, threshold: u32) -> Result<(), DataSourceError> {
        match self.open_until {
            Some(until) if now < until => Err(DataSourceError::CircuitOpen),
            Some(_) => {
                // Half-open: one more failure reopens immediately
                self.open_until = None;
                self.consecutive_failures = threshold.saturating_sub(1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.open_until = None;
    }

    /// Returns true when this failure opened the circuit
    fn record_failure(&mut self, now: Instant, threshold: u32, cooldown: Duration) -> bool {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= threshold && self.open_until.is_none() {
            self.open_until = Some(now + cooldown);
            return true;
        }
        false
    }
}

/// Coinbase Exchange REST client: candles and the product listing
pub struct CoinbaseClient {
    client: reqwest::Client,
    config: FetchConfig,
    limiter: RateLimiter,
    breaker: Mutex<CircuitBreaker>,
}

impl CoinbaseClient {
    pub fn new(config: FetchConfig) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("breakout-scanner/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        let limiter = RateLimiter::new(config.burst, config.min_request_interval);

        Ok(Self {
            client,
            config,
            limiter,
            breaker: Mutex::new(CircuitBreaker::default()),
        })
    }

    /// Fetch candles, ordered ascending by time
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        granularity_secs: u32,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, DataSourceError> {
        let url = format!("{}/products/{}/candles", self.config.api_url, symbol);
        let query = [
            ("granularity", granularity_secs.to_string()),
            ("limit", limit.to_string()),
        ];

        let body = self.get(&url, &query, cancel).await?;
        let candles =
            decode_series(&body).map_err(|e| DataSourceError::MalformedPayload(e.to_string()))?;

        tracing::debug!(
            "[{}] fetched {} candles at {}s granularity",
            symbol,
            candles.len(),
            granularity_secs
        );
        Ok(candles)
    }

    pub async fn fetch_products(&self, cancel: &CancelToken) -> Result<Vec<Product>, DataSourceError> {
        let url = format!("{}/products", self.config.api_url);
        let body = self.get(&url, &[], cancel).await?;
        serde_json::from_slice(&body).map_err(|e| DataSourceError::MalformedPayload(e.to_string()))
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, DataSourceError> {
        self.lock_breaker()
            .check(Instant::now(), self.config.breaker_threshold)?;

        let result = self.get_with_retry(url, query, cancel).await;

        match &result {
            Ok(_) => self.lock_breaker().record_success(),
            Err(error) if error.counts_against_upstream() => {
                let opened = self.lock_breaker().record_failure(
                    Instant::now(),
                    self.config.breaker_threshold,
                    self.config.breaker_cooldown,
                );
                if opened {
                    tracing::warn!(
                        "Circuit opened for {:?} after {} consecutive failures (last: {})",
                        self.config.breaker_cooldown,
                        self.config.breaker_threshold,
                        error
                    );
                }
            }
            Err(_) => {}
        }

        result
    }

    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, String)],
        cancel: &CancelToken,
    ) -> Result<Vec<u8>, DataSourceError> {
        let mut retries = 0u32;

        loop {
            self.limiter.acquire(cancel).await?;

            let response = cancel
                .guard(self.client.get(url).query(query).send())
                .await??;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if retries >= self.config.max_retries {
                    return Err(DataSourceError::RetriesExhausted {
                        attempts: retries + 1,
                    });
                }
                let delay = self.backoff(retries);
                tracing::warn!("Rate limited on {}, retrying in {:?}", url, delay);
                cancel.sleep(delay).await?;
                retries += 1;
                continue;
            }

            if !status.is_success() {
                return Err(DataSourceError::Status(status.as_u16()));
            }

            let body = cancel.guard(response.bytes()).await??;
            return Ok(body.to_vec());
        }
    }

    fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.min(16);
        self.config
            .base_backoff
            .saturating_mul(factor)
            .min(self.config.max_backoff)
    }

    fn lock_breaker(&self) -> std::sync::MutexGuard<'_, CircuitBreaker> {
        self.breaker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CandleSource for CoinbaseClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        granularity_secs: u32,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Vec<Candle>, DataSourceError> {
        CoinbaseClient::fetch_candles(self, symbol, granularity_secs, limit, cancel).await
    }
}

#[async_trait]
impl SymbolUniverse for CoinbaseClient {
    async fn symbols(&self, cancel: &CancelToken) -> Result<Vec<String>, DataSourceError> {
        let products = self.fetch_products(cancel).await?;
        let symbols = tradable_usd_symbols(&products);
        tracing::info!(
            "{} of {} products are online USD pairs",
            symbols.len(),
            products.len()
        );
        Ok(symbols)
    }
}
