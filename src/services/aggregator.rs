use std::sync::Arc;

use crate::business_logic::reasoning::build_reasoning;
use crate::business_logic::scoring::{
    breakout_probability, overall_confidence, scale_momentum, social_breakout_score,
};
use crate::models::analysis::{BreakoutAnalysis, DetailedPatternAnalysis};
use crate::models::pattern::PatternFlags;
use crate::models::social::SocialMetrics;
use crate::services::signals::SignalSource;
use crate::services::social::SocialSource;

/// Blends auxiliary signals into one confidence score per symbol
pub struct SignalAggregator {
    signals: Arc<dyn SignalSource>,
    social: Arc<dyn SocialSource>,
}

impl SignalAggregator {
    pub fn new(signals: Arc<dyn SignalSource>, social: Arc<dyn SocialSource>) -> Self {
        Self { signals, social }
    }

    pub async fn analyze(&self, symbol: &str, patterns: PatternFlags) -> DetailedPatternAnalysis {
        let volume = self.signals.volume(symbol);
        let indicators = self.signals.indicators(symbol);
        let market = self.signals.market(symbol);

        let social = match self.social.fetch(symbol).await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!("[{}] social metrics unavailable: {}", symbol, e);
                SocialMetrics::neutral()
            }
        };
        let social_score = social_breakout_score(&social);

        let probability = breakout_probability(&volume, &indicators, &market, social_score);
        let levels = self.signals.levels(symbol);
        let breakout = BreakoutAnalysis {
            probability,
            momentum: scale_momentum(probability, self.signals.momentum(symbol)),
            support: levels.support,
            resistance: levels.resistance,
            stop_loss: levels.stop_loss,
            targets: levels.targets,
            risk_reward_ratio: levels.risk_reward_ratio,
        };

        let confidence = overall_confidence(&volume, &indicators, &market, probability, social_score);
        let reasoning = build_reasoning(&volume, &indicators, &market, &breakout, &social);

        tracing::debug!(
            "[{}] confidence {:.1}, breakout probability {:.1}, {} reason(s)",
            symbol,
            confidence,
            probability,
            reasoning.len()
        );

        DetailedPatternAnalysis {
            symbol: symbol.to_string(),
            confidence,
            patterns,
            volume,
            indicators,
            market,
            breakout,
            social,
            reasoning,
        }
    }
}
