use crate::models::analysis::{
    BreakoutAnalysis, IndicatorSignal, MarketSentiment, MarketSignal, VolumeSignal,
};
use crate::models::social::SocialMetrics;

/// Human-readable reasons, one per triggered signal, in fixed priority order
pub fn build_reasoning(
    volume: &VolumeSignal,
    indicators: &IndicatorSignal,
    market: &MarketSignal,
    breakout: &BreakoutAnalysis,
    social: &SocialMetrics,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if volume.anomalies {
        reasons.push(
            "Significant volume anomalies detected indicating potential institutional interest"
                .to_string(),
        );
    }
    if volume.whale_activity {
        reasons.push("Whale wallet accumulation observed in recent periods".to_string());
    }
    if indicators.is_oversold() {
        reasons.push("RSI indicating oversold conditions with potential for reversal".to_string());
    }
    if indicators.is_macd_bullish() {
        reasons.push("MACD showing bullish momentum with positive histogram expansion".to_string());
    }
    if indicators.moving_averages.golden_cross {
        reasons.push("Recent golden cross formation on moving averages".to_string());
    }
    if market.sentiment == MarketSentiment::Bullish && market.trend_strength > 70.0 {
        reasons.push("Strong bullish market sentiment with robust trend strength".to_string());
    }
    if breakout.risk_reward_ratio > 3.0 {
        reasons.push("Favorable risk-reward ratio at current levels".to_string());
    }
    if social.volume_change > 50.0 {
        reasons.push(format!(
            "Social mention volume up {:.1}% over the past week",
            social.volume_change
        ));
    }
    if social.sentiment_score > 0.3 {
        reasons.push(
            "Highly positive social sentiment with strong community engagement".to_string(),
        );
    }
    if social.trending_score > 70.0 {
        reasons.push("Significant social media momentum building".to_string());
    }

    reasons
}
