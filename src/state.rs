use std::sync::Arc;

use crate::services::scanner::ScanService;
use crate::services::sources::SymbolUniverse;
use crate::services::timeframes::MultiTimeframeAnalyzer;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<ScanService>,
    pub analyzer: Arc<MultiTimeframeAnalyzer>,
    pub universe: Arc<dyn SymbolUniverse>,
}
