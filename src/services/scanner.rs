use std::sync::Arc;

use tokio::sync::RwLock;

use crate::errors::ScanError;
use crate::models::analysis::DetailedPatternAnalysis;
use crate::models::scan::{ScanOutcome, ScanState, ScanStatusResponse};
use crate::services::cancel::CancelToken;
use crate::services::ranker::BreakoutRanker;
use crate::services::sources::SymbolUniverse;

#[derive(Debug)]
struct ScanInner {
    state: ScanState,
    cancel: Option<CancelToken>,
    last_outcome: Option<ScanOutcome>,
    last_finished_ms: Option<u64>,
    symbols_scanned: usize,
    candidates: Vec<DetailedPatternAnalysis>,
}

/// Single-flight scan over the symbol universe
pub struct ScanService {
    ranker: Arc<BreakoutRanker>,
    universe: Arc<dyn SymbolUniverse>,
    inner: RwLock<ScanInner>,
}

impl ScanService {
    pub fn new(ranker: Arc<BreakoutRanker>, universe: Arc<dyn SymbolUniverse>) -> Self {
        Self {
            ranker,
            universe,
            inner: RwLock::new(ScanInner {
                state: ScanState::Idle,
                cancel: None,
                last_outcome: None,
                last_finished_ms: None,
                symbols_scanned: 0,
                candidates: Vec::new(),
            }),
        }
    }

    /// Idle -> Scanning, then run the scan in the background
    pub async fn start(self: &Arc<Self>) -> Result<(), ScanError> {
        let cancel = {
            let mut inner = self.inner.write().await;
            if inner.state == ScanState::Scanning {
                return Err(ScanError::AlreadyScanning);
            }
            let cancel = CancelToken::new();
            inner.state = ScanState::Scanning;
            inner.cancel = Some(cancel.clone());
            cancel
        };

        let scan = tokio::spawn({
            let service = Arc::clone(self);
            async move { service.run(cancel).await }
        });

        // A panicking scan must not leave the service stuck in Scanning
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = scan.await {
                tracing::error!("Scan task aborted: {}", e);
                service.finish(ScanOutcome::Failed, None).await;
            }
        });
        Ok(())
    }

    pub async fn cancel(&self) -> Result<(), ScanError> {
        let inner = self.inner.read().await;
        match (&inner.state, &inner.cancel) {
            (ScanState::Scanning, Some(cancel)) => {
                tracing::info!("Scan cancellation requested");
                cancel.cancel();
                Ok(())
            }
            _ => Err(ScanError::NotScanning),
        }
    }

    pub async fn status(&self) -> ScanStatusResponse {
        let inner = self.inner.read().await;
        ScanStatusResponse {
            state: inner.state,
            last_outcome: inner.last_outcome,
            last_finished_ms: inner.last_finished_ms,
            symbols_scanned: inner.symbols_scanned,
            candidates: inner.candidates.clone(),
        }
    }

    async fn run(&self, cancel: CancelToken) {
        tracing::info!("Scan started");

        let (outcome, completed) = match self.universe.symbols(&cancel).await {
            Ok(symbols) => {
                tracing::info!("Scanning {} symbols", symbols.len());
                match self.ranker.rank(&symbols, &cancel).await {
                    Some(candidates) => (ScanOutcome::Completed, Some((symbols.len(), candidates))),
                    None => (ScanOutcome::Cancelled, None),
                }
            }
            Err(e) if cancel.is_cancelled() => {
                tracing::info!("Scan cancelled while loading universe: {}", e);
                (ScanOutcome::Cancelled, None)
            }
            Err(e) => {
                tracing::error!("Failed to load symbol universe: {}", e);
                (ScanOutcome::Failed, None)
            }
        };

        self.finish(outcome, completed).await;
    }

    /// Back to Idle; only a completed scan replaces the published candidates
    async fn finish(
        &self,
        outcome: ScanOutcome,
        completed: Option<(usize, Vec<DetailedPatternAnalysis>)>,
    ) {
        let mut inner = self.inner.write().await;
        if let Some((scanned, candidates)) = completed {
            inner.candidates = candidates;
            inner.symbols_scanned = scanned;
        }
        inner.state = ScanState::Idle;
        inner.cancel = None;
        inner.last_outcome = Some(outcome);
        inner.last_finished_ms = Some(chrono::Utc::now().timestamp_millis() as u64);

        match outcome {
            ScanOutcome::Completed => tracing::info!(
                "Scan completed: {} candidates from {} symbols",
                inner.candidates.len(),
                inner.symbols_scanned
            ),
            other => tracing::warn!("Scan finished without results: {:?}", other),
        }
    }
}
