use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::candle::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    AscendingTriangle,
    CupAndHandle,
}

/// Candle granularity analysed per symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Timeframe {
    /// Fetch order used by the multi-timeframe analyzer
    pub const ALL: [Timeframe; 3] = [Timeframe::OneHour, Timeframe::SixHours, Timeframe::OneDay];

    pub fn granularity_secs(self) -> u32 {
        match self {
            Timeframe::OneHour => 3_600,
            Timeframe::SixHours => 21_600,
            Timeframe::OneDay => 86_400,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::SixHours => "6h",
            Timeframe::OneDay => "1d",
        }
    }
}

/// A detector hit before it is attributed to a timeframe
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub pattern: PatternKind,
    pub confidence: f64,
    pub details: String,
}

impl PatternMatch {
    pub fn on(self, timeframe: Timeframe) -> PatternResult {
        PatternResult {
            pattern: self.pattern,
            confidence: self.confidence,
            details: self.details,
            timeframe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PatternResult {
    pub pattern: PatternKind,
    /// 0-100
    pub confidence: f64,
    pub details: String,
    pub timeframe: Timeframe,
}

/// Time span (epoch seconds) of the series a timeframe was analysed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeframeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeframeWindow {
    /// Zeroed when the series is empty
    pub fn covering(candles: &[Candle]) -> Self {
        let start = candles.iter().map(|c| c.time).min();
        let end = candles.iter().map(|c| c.time).max();
        match (start, end) {
            (Some(start), Some(end)) => Self { start, end },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct TimeframeReport {
    pub patterns: Vec<PatternResult>,
    pub window: TimeframeWindow,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MultiTimeframeReport {
    pub symbol: String,
    pub hourly: TimeframeReport,
    pub six_hour: TimeframeReport,
    pub daily: TimeframeReport,
}

impl MultiTimeframeReport {
    pub fn timeframe(&self, timeframe: Timeframe) -> &TimeframeReport {
        match timeframe {
            Timeframe::OneHour => &self.hourly,
            Timeframe::SixHours => &self.six_hour,
            Timeframe::OneDay => &self.daily,
        }
    }

    pub fn all_patterns(&self) -> impl Iterator<Item = &PatternResult> {
        Timeframe::ALL
            .into_iter()
            .flat_map(move |tf| self.timeframe(tf).patterns.iter())
    }
}

/// Which patterns were seen on any timeframe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PatternFlags {
    pub ascending_triangle: bool,
    pub cup_and_handle: bool,
}

impl From<&MultiTimeframeReport> for PatternFlags {
    fn from(report: &MultiTimeframeReport) -> Self {
        let mut flags = PatternFlags::default();
        for result in report.all_patterns() {
            match result.pattern {
                PatternKind::AscendingTriangle => flags.ascending_triangle = true,
                PatternKind::CupAndHandle => flags.cup_and_handle = true,
            }
        }
        flags
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct PatternsQuery {
    /// Trading pair, e.g. BTC-USD
    #[validate(length(min = 3, max = 24), custom(function = "validate_symbol"))]
    #[param(example = "BTC-USD")]
    pub symbol: String,
}

/// Accepts `BASE-QUOTE` pairs of upper-case alphanumerics
pub fn validate_symbol(value: &str) -> Result<(), ValidationError> {
    let valid_part =
        |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

    match value.split_once('-') {
        Some((base, quote)) if valid_part(base) && valid_part(quote) => Ok(()),
        _ => {
            let mut error = ValidationError::new("invalid_symbol");
            error.message = Some("symbol must look like BASE-QUOTE, e.g. BTC-USD".into());
            Err(error)
        }
    }
}
