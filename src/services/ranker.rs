use std::sync::Arc;

use crate::models::analysis::DetailedPatternAnalysis;
use crate::models::pattern::PatternFlags;
use crate::services::aggregator::SignalAggregator;
use crate::services::cancel::CancelToken;
use crate::services::timeframes::MultiTimeframeAnalyzer;

/// Scores every symbol in the universe and keeps the strongest candidates
pub struct BreakoutRanker {
    analyzer: Arc<MultiTimeframeAnalyzer>,
    aggregator: SignalAggregator,
    top_n: usize,
}

impl BreakoutRanker {
    pub fn new(analyzer: Arc<MultiTimeframeAnalyzer>, aggregator: SignalAggregator, top_n: usize) -> Self {
        Self {
            analyzer,
            aggregator,
            top_n,
        }
    }

    /// Symbols are processed one at a time. Returns `None` if cancelled
    /// before every symbol was scored.
    pub async fn rank(
        &self,
        symbols: &[String],
        cancel: &CancelToken,
    ) -> Option<Vec<DetailedPatternAnalysis>> {
        let mut analyses = Vec::with_capacity(symbols.len());

        for (i, symbol) in symbols.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Ranking cancelled after {} of {} symbols", i, symbols.len());
                return None;
            }

            let report = self.analyzer.analyze(symbol, cancel).await;
            let flags = PatternFlags::from(&report);
            analyses.push(self.aggregator.analyze(symbol, flags).await);
        }

        if cancel.is_cancelled() {
            return None;
        }

        Some(top_candidates(analyses, self.top_n))
    }
}

/// Stable sort by confidence, highest first, truncated to `limit`
pub fn top_candidates(
    mut analyses: Vec<DetailedPatternAnalysis>,
    limit: usize,
) -> Vec<DetailedPatternAnalysis> {
    analyses.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    analyses.truncate(limit);
    analyses
}
