pub mod analysis;
pub mod candle;
pub mod health;
pub mod pattern;
pub mod scan;
pub mod social;
pub mod universe;
