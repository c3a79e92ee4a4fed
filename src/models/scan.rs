use serde::Serialize;
use utoipa::ToSchema;

use crate::models::analysis::DetailedPatternAnalysis;

/// Scan lifecycle; only `Idle -> Scanning` is guarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Idle,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScanStatusResponse {
    pub state: ScanState,
    pub last_outcome: Option<ScanOutcome>,
    /// Epoch ms of the last finished scan
    pub last_finished_ms: Option<u64>,
    /// Symbols in the universe of the last completed scan
    pub symbols_scanned: usize,
    pub candidates: Vec<DetailedPatternAnalysis>,
}
