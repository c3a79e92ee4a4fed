use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Candle {
    /// Bucket start time (epoch seconds)
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One candle as the exchange sends it: `[time, low, high, open, close, volume]`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireCandle(pub f64, pub f64, pub f64, pub f64, pub f64, pub f64);

impl From<WireCandle> for Candle {
    fn from(wire: WireCandle) -> Self {
        let WireCandle(time, low, high, open, close, volume) = wire;
        Self {
            time: time as i64,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Decode a candle payload into a series ordered ascending by time
pub fn decode_series(payload: &[u8]) -> Result<Vec<Candle>, serde_json::Error> {
    let wire: Vec<WireCandle> = serde_json::from_slice(payload)?;
    let mut candles: Vec<Candle> = wire.into_iter().map(Candle::from).collect();
    candles.sort_by_key(|candle| candle.time);
    Ok(candles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_series_maps_wire_order_and_sorts_ascending() {
        let payload = br#"[
            [1700007200, 9.5, 12.0, 10.0, 11.5, 250.0],
            [1700003600, 9.0, 11.0, 10.2, 10.0, 100.0]
        ]"#;

        let candles = decode_series(payload).unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_700_003_600);
        assert_eq!(candles[0].low, 9.0);
        assert_eq!(candles[0].high, 11.0);
        assert_eq!(candles[0].open, 10.2);
        assert_eq!(candles[0].close, 10.0);
        assert_eq!(candles[0].volume, 100.0);
        assert_eq!(candles[1].time, 1_700_007_200);
        assert_eq!(candles[1].close, 11.5);
    }

    #[test]
    fn decode_series_rejects_short_tuples() {
        let payload = br#"[[1700003600, 9.0, 11.0]]"#;
        assert!(decode_series(payload).is_err());
    }

    #[test]
    fn decode_series_rejects_objects() {
        let payload = br#"{"message": "NotFound"}"#;
        assert!(decode_series(payload).is_err());
    }
}
