use std::sync::Arc;

use crate::business_logic::config::PatternConfig;
use crate::business_logic::patterns::detect_all;
use crate::models::pattern::{MultiTimeframeReport, Timeframe, TimeframeReport, TimeframeWindow};
use crate::services::cancel::CancelToken;
use crate::services::sources::CandleSource;

/// Runs the pattern detectors on 1h, 6h and 1d candles for one symbol
pub struct MultiTimeframeAnalyzer {
    source: Arc<dyn CandleSource>,
    config: PatternConfig,
    candle_limit: usize,
}

impl MultiTimeframeAnalyzer {
    pub fn new(source: Arc<dyn CandleSource>, config: PatternConfig, candle_limit: usize) -> Self {
        Self {
            source,
            config,
            candle_limit,
        }
    }

    /// Fetches the timeframes one after another; a failed fetch leaves that
    /// timeframe empty with a zeroed window
    pub async fn analyze(&self, symbol: &str, cancel: &CancelToken) -> MultiTimeframeReport {
        let hourly = self.analyze_timeframe(symbol, Timeframe::OneHour, cancel).await;
        let six_hour = self.analyze_timeframe(symbol, Timeframe::SixHours, cancel).await;
        let daily = self.analyze_timeframe(symbol, Timeframe::OneDay, cancel).await;

        MultiTimeframeReport {
            symbol: symbol.to_string(),
            hourly,
            six_hour,
            daily,
        }
    }

    async fn analyze_timeframe(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        cancel: &CancelToken,
    ) -> TimeframeReport {
        let candles = match self
            .source
            .fetch_candles(symbol, timeframe.granularity_secs(), self.candle_limit, cancel)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                tracing::warn!(
                    "[{}] {} candles unavailable, skipping timeframe: {}",
                    symbol,
                    timeframe.label(),
                    e
                );
                return TimeframeReport::default();
            }
        };

        let patterns: Vec<_> = detect_all(&candles, &self.config)
            .into_iter()
            .map(|hit| hit.on(timeframe))
            .collect();

        if !patterns.is_empty() {
            tracing::info!(
                "[{}] {} pattern(s) on {}: {:?}",
                symbol,
                patterns.len(),
                timeframe.label(),
                patterns.iter().map(|p| p.pattern).collect::<Vec<_>>()
            );
        }

        TimeframeReport {
            patterns,
            window: TimeframeWindow::covering(&candles),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::errors::DataSourceError;
    use crate::models::candle::Candle;
    use crate::models::pattern::{PatternFlags, PatternKind};

    /// Serves canned series per granularity and records the call order
    #[derive(Default)]
    pub(crate) struct StubCandles {
        pub series: HashMap<u32, Vec<Candle>>,
        pub failing: Vec<u32>,
        pub calls: Mutex<Vec<(String, u32)>>,
        pub delay: Option<std::time::Duration>,
    }

    #[async_trait]
    impl CandleSource for StubCandles {
        async fn fetch_candles(
            &self,
            symbol: &str,
            granularity_secs: u32,
            _limit: usize,
            cancel: &CancelToken,
        ) -> Result<Vec<Candle>, DataSourceError> {
            self.calls
                .lock()
                .unwrap()
                .push((symbol.to_string(), granularity_secs));
            if let Some(delay) = self.delay {
                cancel.sleep(delay).await?;
            }
            if self.failing.contains(&granularity_secs) {
                return Err(DataSourceError::Status(500));
            }
            Ok(self.series.get(&granularity_secs).cloned().unwrap_or_default())
        }
    }

    pub(crate) fn cup_series(start: i64, step: i64) -> Vec<Candle> {
        (0..30)
            .map(|i| {
                let close = if i < 15 {
                    115.0 - i as f64
                } else {
                    100.0 + (i - 15) as f64
                };
                Candle {
                    time: start + i as i64 * step,
                    open: close - 0.1,
                    high: close + 0.2,
                    low: close - 0.2,
                    close,
                    volume: 1.0,
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn fetches_each_timeframe_in_order_and_tags_results() {
        let stub = Arc::new(StubCandles {
            series: HashMap::from([(86_400, cup_series(1_000, 86_400))]),
            ..StubCandles::default()
        });
        let analyzer = MultiTimeframeAnalyzer::new(stub.clone(), PatternConfig::default(), 300);

        let report = analyzer.analyze("BTC-USD", &CancelToken::new()).await;

        let calls = stub.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                ("BTC-USD".to_string(), 3_600),
                ("BTC-USD".to_string(), 21_600),
                ("BTC-USD".to_string(), 86_400),
            ]
        );
        assert!(report.hourly.patterns.is_empty());
        assert_eq!(report.daily.patterns.len(), 1);
        assert_eq!(report.daily.patterns[0].pattern, PatternKind::CupAndHandle);
        assert_eq!(report.daily.patterns[0].timeframe, Timeframe::OneDay);
        assert_eq!(
            report.daily.window,
            TimeframeWindow {
                start: 1_000,
                end: 1_000 + 29 * 86_400
            }
        );
        assert!(PatternFlags::from(&report).cup_and_handle);
    }

    #[tokio::test]
    async fn failed_timeframe_degrades_without_aborting_others() {
        let stub = Arc::new(StubCandles {
            series: HashMap::from([
                (3_600, cup_series(0, 3_600)),
                (86_400, cup_series(0, 86_400)),
            ]),
            failing: vec![21_600],
            ..StubCandles::default()
        });
        let analyzer = MultiTimeframeAnalyzer::new(stub, PatternConfig::default(), 300);

        let report = analyzer.analyze("ETH-USD", &CancelToken::new()).await;

        assert!(report.six_hour.patterns.is_empty());
        assert_eq!(report.six_hour.window, TimeframeWindow::default());
        assert_eq!(report.hourly.patterns.len(), 1);
        assert_eq!(report.daily.patterns.len(), 1);
    }
}
