use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::social::{SentimentDay, SocialMetrics};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;
const HISTORY_DAYS: usize = 7;

/// Social-mention feed for one symbol
#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn fetch(&self, symbol: &str) -> anyhow::Result<SocialMetrics>;
}

/// Generates a plausible week of mention counts, biased toward recent activity
pub struct SimulatedSocialSource {
    rng: Mutex<StdRng>,
}

impl SimulatedSocialSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seven daily buckets, newest first
    fn history(&self, now_ms: i64) -> Vec<SentimentDay> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        (0..HISTORY_DAYS)
            .map(|i| {
                let base_volume = rng.gen::<f64>() * 1000.0 + 500.0;
                let multiplier = rng.gen::<f64>() * 0.5 + 0.75;
                let recency_boost = (HISTORY_DAYS - i) as f64 / HISTORY_DAYS as f64;
                let total = (base_volume * multiplier * (1.0 + recency_boost)).floor() as u32;

                let positive = (total as f64 * (0.3 + rng.gen::<f64>() * 0.2)).floor() as u32;
                let negative = (total as f64 * (0.2 + rng.gen::<f64>() * 0.15)).floor() as u32;

                SentimentDay {
                    positive,
                    negative,
                    neutral: total - positive - negative,
                    total,
                    timestamp_ms: now_ms - i as i64 * DAY_MS,
                }
            })
            .collect()
    }
}

impl Default for SimulatedSocialSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SocialSource for SimulatedSocialSource {
    async fn fetch(&self, symbol: &str) -> anyhow::Result<SocialMetrics> {
        let history = self.history(chrono::Utc::now().timestamp_millis());
        let metrics = SocialMetrics::from_history(&history);
        tracing::trace!(
            "[{}] social: {} mentions, {:.1}% change",
            symbol,
            metrics.mention_volume,
            metrics.volume_change
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_has_a_week_of_consistent_buckets() {
        let source = SimulatedSocialSource::seeded(3);
        let now = 1_700_000_000_000;

        let history = source.history(now);

        assert_eq!(history.len(), 7);
        for (i, day) in history.iter().enumerate() {
            assert_eq!(day.timestamp_ms, now - i as i64 * DAY_MS);
            assert_eq!(day.positive + day.negative + day.neutral, day.total);
            assert!(day.total >= 375);
        }
    }

    #[tokio::test]
    async fn fetch_produces_bounded_metrics() {
        let source = SimulatedSocialSource::seeded(11);

        let metrics = source.fetch("SOL-USD").await.unwrap();

        assert_eq!(metrics.weekly_trend.len(), 7);
        assert!((-1.0..=1.0).contains(&metrics.sentiment_score));
        assert!((0.0..=100.0).contains(&metrics.trending_score));
    }
}
