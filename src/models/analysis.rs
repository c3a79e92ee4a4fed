use serde::Serialize;
use utoipa::ToSchema;

use crate::models::pattern::PatternFlags;
use crate::models::social::SocialMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VolumeTrend {
    Increasing,
    Neutral,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VolumeSignal {
    pub anomalies: bool,
    pub trend: VolumeTrend,
    pub whale_activity: bool,
    /// 0-100
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MacdTrend {
    Bullish,
    Neutral,
    Bearish,
}

impl MacdTrend {
    /// Oversold reads bullish, overbought bearish
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi < 40.0 {
            MacdTrend::Bullish
        } else if rsi > 60.0 {
            MacdTrend::Bearish
        } else {
            MacdTrend::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MacdSignal {
    pub histogram: f64,
    pub signal: f64,
    pub trend: MacdTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MovingAverages {
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub golden_cross: bool,
    pub death_cross: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct IndicatorSignal {
    pub rsi: f64,
    pub macd: MacdSignal,
    pub moving_averages: MovingAverages,
}

impl IndicatorSignal {
    pub fn is_oversold(&self) -> bool {
        self.rsi < 40.0
    }

    pub fn is_macd_bullish(&self) -> bool {
        self.macd.trend == MacdTrend::Bullish
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarketSentiment {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Volatility {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MarketSignal {
    pub sentiment: MarketSentiment,
    pub volatility: Volatility,
    /// 0-100
    pub trend_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceTargets {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

/// Price levels on a normalized baseline of 100
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceLevels {
    pub support: f64,
    pub resistance: f64,
    pub stop_loss: f64,
    pub targets: PriceTargets,
    pub risk_reward_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TimeframeMomentum {
    pub hourly: f64,
    pub six_hour: f64,
    pub daily: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakoutAnalysis {
    pub probability: f64,
    pub momentum: TimeframeMomentum,
    pub support: f64,
    pub resistance: f64,
    pub stop_loss: f64,
    pub targets: PriceTargets,
    pub risk_reward_ratio: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DetailedPatternAnalysis {
    pub symbol: String,
    pub confidence: f64,
    pub patterns: PatternFlags,
    pub volume: VolumeSignal,
    pub indicators: IndicatorSignal,
    pub market: MarketSignal,
    pub breakout: BreakoutAnalysis,
    pub social: SocialMetrics,
    pub reasoning: Vec<String>,
}
