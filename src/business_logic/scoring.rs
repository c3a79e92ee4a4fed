use crate::models::analysis::{IndicatorSignal, MarketSignal, TimeframeMomentum, VolumeSignal};
use crate::models::social::SocialMetrics;

/// Lower bound of each timeframe's momentum multiplier; every band is 0.4 wide
const DAILY_MULTIPLIER_FLOOR: f64 = 0.8;
const SIX_HOUR_MULTIPLIER_FLOOR: f64 = 0.7;
const HOURLY_MULTIPLIER_FLOOR: f64 = 0.6;
const MULTIPLIER_SPAN: f64 = 0.4;

/// Unit draws in [0, 1) placing each timeframe inside its multiplier band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumDraws {
    pub hourly: f64,
    pub six_hour: f64,
    pub daily: f64,
}

/// Social feed condensed to 0-100
pub fn social_breakout_score(social: &SocialMetrics) -> f64 {
    let volume = social.volume_change.clamp(0.0, 100.0) * 0.4;
    let sentiment = (social.sentiment_score + 1.0) * 50.0 * 0.3;
    let trending = social.trending_score * 0.3;
    volume + sentiment + trending
}

pub fn breakout_probability(
    volume: &VolumeSignal,
    indicators: &IndicatorSignal,
    market: &MarketSignal,
    social_score: f64,
) -> f64 {
    volume.score * 0.3
        + bonus(indicators.is_oversold(), 20.0)
        + bonus(indicators.is_macd_bullish(), 15.0)
        + bonus(indicators.moving_averages.golden_cross, 15.0)
        + market.trend_strength * 0.2
        + social_score * 0.2
}

pub fn overall_confidence(
    volume: &VolumeSignal,
    indicators: &IndicatorSignal,
    market: &MarketSignal,
    probability: f64,
    social_score: f64,
) -> f64 {
    volume.score * 0.25
        + bonus(indicators.is_oversold(), 15.0)
        + bonus(indicators.is_macd_bullish(), 15.0)
        + bonus(indicators.moving_averages.golden_cross, 15.0)
        + market.trend_strength * 0.15
        + probability * 0.15
        + social_score * 0.15
}

pub fn scale_momentum(probability: f64, draws: MomentumDraws) -> TimeframeMomentum {
    let scale = |floor: f64, draw: f64| probability * (floor + draw.clamp(0.0, 1.0) * MULTIPLIER_SPAN);
    TimeframeMomentum {
        hourly: scale(HOURLY_MULTIPLIER_FLOOR, draws.hourly),
        six_hour: scale(SIX_HOUR_MULTIPLIER_FLOOR, draws.six_hour),
        daily: scale(DAILY_MULTIPLIER_FLOOR, draws.daily),
    }
}

fn bonus(condition: bool, points: f64) -> f64 {
    if condition {
        points
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{
        MacdSignal, MacdTrend, MarketSentiment, MovingAverages, Volatility, VolumeTrend,
    };

    fn volume(score: f64) -> VolumeSignal {
        VolumeSignal {
            anomalies: false,
            trend: VolumeTrend::Neutral,
            whale_activity: false,
            score,
        }
    }

    fn indicators(rsi: f64, golden_cross: bool) -> IndicatorSignal {
        IndicatorSignal {
            rsi,
            macd: MacdSignal {
                histogram: 0.0,
                signal: 0.0,
                trend: MacdTrend::from_rsi(rsi),
            },
            moving_averages: MovingAverages {
                ema20: 100.0,
                ema50: 100.0,
                ema200: 100.0,
                golden_cross,
                death_cross: false,
            },
        }
    }

    fn market(trend_strength: f64) -> MarketSignal {
        MarketSignal {
            sentiment: MarketSentiment::Neutral,
            volatility: Volatility::Medium,
            trend_strength,
        }
    }

    fn social(volume_change: f64, sentiment_score: f64, trending_score: f64) -> SocialMetrics {
        SocialMetrics {
            volume_change,
            sentiment_score,
            trending_score,
            ..SocialMetrics::neutral()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn social_score_weights_and_clamps() {
        // 0.4*100 + 0.3*75 + 0.3*80
        assert!(close(social_breakout_score(&social(250.0, 0.5, 80.0)), 86.5));
        // Negative change contributes nothing
        assert!(close(social_breakout_score(&social(-40.0, -1.0, 0.0)), 0.0));
    }

    #[test]
    fn probability_adds_indicator_bonuses() {
        // 0.3*50 + 20 + 15 + 15 + 0.2*60 + 0.2*40
        let p = breakout_probability(&volume(50.0), &indicators(35.0, true), &market(60.0), 40.0);
        assert!(close(p, 85.0));

        // Neutral RSI: no oscillator or MACD bonus
        let p = breakout_probability(&volume(50.0), &indicators(50.0, false), &market(60.0), 40.0);
        assert!(close(p, 35.0));
    }

    #[test]
    fn confidence_blends_probability() {
        // 0.25*40 + 15 + 15 + 0 + 0.15*20 + 0.15*60 + 0.15*30
        let c = overall_confidence(&volume(40.0), &indicators(30.0, false), &market(20.0), 60.0, 30.0);
        assert!(close(c, 56.5));
    }

    #[test]
    fn momentum_stays_within_bands() {
        let low = scale_momentum(
            100.0,
            MomentumDraws {
                hourly: 0.0,
                six_hour: 0.0,
                daily: 0.0,
            },
        );
        assert!(close(low.hourly, 60.0));
        assert!(close(low.six_hour, 70.0));
        assert!(close(low.daily, 80.0));

        let high = scale_momentum(
            100.0,
            MomentumDraws {
                hourly: 1.0,
                six_hour: 1.0,
                daily: 1.0,
            },
        );
        assert!(close(high.hourly, 100.0));
        assert!(close(high.six_hour, 110.0));
        assert!(close(high.daily, 120.0));
    }
}
