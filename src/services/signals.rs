use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::business_logic::scoring::MomentumDraws;
use crate::models::analysis::{
    IndicatorSignal, MacdSignal, MacdTrend, MarketSentiment, MarketSignal, MovingAverages,
    PriceLevels, PriceTargets, Volatility, VolumeSignal, VolumeTrend,
};

/// Supplies the auxiliary per-symbol signals the aggregator blends
pub trait SignalSource: Send + Sync {
    fn volume(&self, symbol: &str) -> VolumeSignal;
    fn indicators(&self, symbol: &str) -> IndicatorSignal;
    fn market(&self, symbol: &str) -> MarketSignal;
    fn levels(&self, symbol: &str) -> PriceLevels;
    fn momentum(&self, symbol: &str) -> MomentumDraws;
}

/// Simulated signals drawn uniformly inside fixed bands.
///
/// Nothing here is derived from candles: the values stand in for a real
/// volume / indicator / market feed and only exercise the scoring weights.
pub struct SimulatedSignals {
    rng: Mutex<StdRng>,
}

impl SimulatedSignals {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

impl Default for SimulatedSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// `lo + draw * span`
fn band(rng: &mut StdRng, lo: f64, span: f64) -> f64 {
    lo + rng.gen::<f64>() * span
}

impl SignalSource for SimulatedSignals {
    fn volume(&self, _symbol: &str) -> VolumeSignal {
        self.with_rng(|rng| {
            let anomalies = rng.gen::<f64>() > 0.7;
            let trend = if rng.gen::<f64>() > 0.6 {
                VolumeTrend::Increasing
            } else if rng.gen::<f64>() > 0.3 {
                VolumeTrend::Neutral
            } else {
                VolumeTrend::Decreasing
            };
            VolumeSignal {
                anomalies,
                trend,
                whale_activity: rng.gen::<f64>() > 0.8,
                score: band(rng, 0.0, 100.0),
            }
        })
    }

    fn indicators(&self, _symbol: &str) -> IndicatorSignal {
        self.with_rng(|rng| {
            let rsi = band(rng, 30.0, 40.0);
            IndicatorSignal {
                rsi,
                macd: MacdSignal {
                    histogram: band(rng, -1.0, 2.0),
                    signal: band(rng, -1.0, 2.0),
                    trend: MacdTrend::from_rsi(rsi),
                },
                moving_averages: MovingAverages {
                    ema20: band(rng, 100.0, 20.0),
                    ema50: band(rng, 90.0, 30.0),
                    ema200: band(rng, 80.0, 40.0),
                    golden_cross: rng.gen::<f64>() > 0.7,
                    death_cross: rng.gen::<f64>() > 0.9,
                },
            }
        })
    }

    fn market(&self, _symbol: &str) -> MarketSignal {
        self.with_rng(|rng| {
            let sentiment = if rng.gen::<f64>() > 0.6 {
                MarketSentiment::Bullish
            } else if rng.gen::<f64>() > 0.3 {
                MarketSentiment::Neutral
            } else {
                MarketSentiment::Bearish
            };
            let volatility = if rng.gen::<f64>() > 0.6 {
                Volatility::High
            } else if rng.gen::<f64>() > 0.3 {
                Volatility::Medium
            } else {
                Volatility::Low
            };
            MarketSignal {
                sentiment,
                volatility,
                trend_strength: band(rng, 0.0, 100.0),
            }
        })
    }

    fn levels(&self, _symbol: &str) -> PriceLevels {
        self.with_rng(|rng| PriceLevels {
            support: band(rng, 90.0, 20.0),
            resistance: band(rng, 110.0, 20.0),
            stop_loss: band(rng, 85.0, 10.0),
            targets: PriceTargets {
                conservative: band(rng, 115.0, 10.0),
                moderate: band(rng, 130.0, 20.0),
                aggressive: band(rng, 150.0, 50.0),
            },
            risk_reward_ratio: band(rng, 2.0, 3.0),
        })
    }

    fn momentum(&self, _symbol: &str) -> MomentumDraws {
        self.with_rng(|rng| MomentumDraws {
            daily: rng.gen(),
            six_hour: rng.gen(),
            hourly: rng.gen(),
        })
    }
}
