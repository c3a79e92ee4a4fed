use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Raw mention counts for one day
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentDay {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub total: u32,
    /// Epoch ms
    pub timestamp_ms: i64,
}

impl SentimentDay {
    /// Net sentiment in [-1, 1]; zero for a day without mentions
    pub fn net_sentiment(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.positive as f64 - self.negative as f64) / self.total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SocialTrendPoint {
    /// YYYY-MM-DD (UTC)
    pub date: String,
    pub mentions: u32,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SocialMetrics {
    pub mention_volume: u32,
    /// Percent change between the oldest and the newest day
    pub volume_change: f64,
    /// -1 to 1
    pub sentiment_score: f64,
    /// 0 to 100
    pub trending_score: f64,
    /// Oldest day first
    pub weekly_trend: Vec<SocialTrendPoint>,
}

impl SocialMetrics {
    /// Stand-in used when the social feed is unavailable
    pub fn neutral() -> Self {
        Self {
            mention_volume: 0,
            volume_change: 0.0,
            sentiment_score: 0.0,
            trending_score: 0.0,
            weekly_trend: Vec::new(),
        }
    }

    /// Derive metrics from daily buckets ordered newest first
    pub fn from_history(history: &[SentimentDay]) -> Self {
        let (Some(newest), Some(oldest)) = (history.first(), history.last()) else {
            return Self::neutral();
        };

        let recent_volume = newest.total as f64;
        let volume_change = if oldest.total == 0 {
            0.0
        } else {
            (recent_volume - oldest.total as f64) / oldest.total as f64 * 100.0
        };

        let total_mentions: u32 = history.iter().map(|day| day.total).sum();
        let sentiment_score = if total_mentions == 0 {
            0.0
        } else {
            history
                .iter()
                .map(|day| day.net_sentiment() * (day.total as f64 / total_mentions as f64))
                .sum()
        };

        let trending_score = (volume_change * 0.7
            + sentiment_score * 50.0
            + recent_volume / 1000.0 * 30.0)
            .clamp(0.0, 100.0);

        let weekly_trend = history
            .iter()
            .rev()
            .map(|day| SocialTrendPoint {
                date: format_day(day.timestamp_ms),
                mentions: day.total,
                sentiment: day.net_sentiment(),
            })
            .collect();

        Self {
            mention_volume: newest.total,
            volume_change,
            sentiment_score,
            trending_score,
            weekly_trend,
        }
    }
}

fn format_day(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
