pub mod aggregator;
pub mod cancel;
pub mod coinbase;
pub mod ranker;
pub mod rate_limiter;
pub mod scanner;
pub mod signals;
pub mod social;
pub mod sources;
pub mod timeframes;
