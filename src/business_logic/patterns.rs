use crate::business_logic::config::PatternConfig;
use crate::models::candle::Candle;
use crate::models::pattern::{PatternKind, PatternMatch};

const TOUCH_SCORE: f64 = 40.0;
const HIGHER_LOWS_SCORE: f64 = 40.0;
const BREAKOUT_SCORE: f64 = 10.0;

const U_SHAPE_SCORE: f64 = 50.0;
const HANDLE_SCORE: f64 = 30.0;
const UP_CLOSE_SCORE: f64 = 10.0;

/// Run every detector over a series ordered ascending by time
pub fn detect_all(candles: &[Candle], config: &PatternConfig) -> Vec<PatternMatch> {
    [
        detect_ascending_triangle(candles, config),
        detect_cup_and_handle(candles, config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Flat resistance touched repeatedly while lows climb, closing above it
pub fn detect_ascending_triangle(candles: &[Candle], config: &PatternConfig) -> Option<PatternMatch> {
    let window = trailing(candles, config.triangle_window)?;
    let last = window.last()?;

    let resistance = max_by(window, |c| c.high);
    let tolerance = config.touch_tolerance * resistance;
    let touches = window
        .iter()
        .filter(|c| (c.high - resistance).abs() <= tolerance)
        .count();
    let higher_lows = window.windows(2).all(|pair| pair[1].low >= pair[0].low);
    let breakout = last.close > resistance;

    let confidence = score(touches >= config.min_touches, TOUCH_SCORE)
        + score(higher_lows, HIGHER_LOWS_SCORE)
        + score(breakout, BREAKOUT_SCORE);

    if confidence < config.min_confidence {
        return None;
    }

    tracing::debug!(
        "Ascending triangle: resistance {:.4}, {} touches, close {:.4}",
        resistance,
        touches,
        last.close
    );

    Some(PatternMatch {
        pattern: PatternKind::AscendingTriangle,
        confidence,
        details: format!(
            "Resistance at {:.4} touched {} times with rising lows; closed above at {:.4}",
            resistance, touches, last.close
        ),
    })
}

/// Rounded bottom followed by a tight consolidation that closes up
pub fn detect_cup_and_handle(candles: &[Candle], config: &PatternConfig) -> Option<PatternMatch> {
    let window = trailing(candles, config.cup_window)?;
    if config.handle_len == 0 || config.handle_len > window.len() {
        return None;
    }
    let last = window.last()?;

    let (left, right) = window.split_at(window.len() / 2);
    let u_shape = left.windows(2).all(|pair| pair[1].close <= pair[0].close)
        && right.windows(2).all(|pair| pair[1].close >= pair[0].close);

    let price_range = max_by(window, |c| c.close) - min_by(window, |c| c.close);

    let handle = &window[window.len() - config.handle_len..];
    let handle_range = max_by(handle, |c| c.high) - min_by(handle, |c| c.low);
    let has_handle = handle_range <= config.max_handle_ratio * price_range;

    let up_close = last.close > handle[0].open;

    let confidence = score(u_shape, U_SHAPE_SCORE)
        + score(has_handle, HANDLE_SCORE)
        + score(up_close, UP_CLOSE_SCORE);

    if confidence < config.min_confidence {
        return None;
    }

    tracing::debug!(
        "Cup and handle: cup range {:.4}, handle range {:.4}",
        price_range,
        handle_range
    );

    Some(PatternMatch {
        pattern: PatternKind::CupAndHandle,
        confidence,
        details: format!(
            "Cup spanning {:.4} with a {:.4} handle; last close {:.4}",
            price_range, handle_range, last.close
        ),
    })
}

fn trailing(candles: &[Candle], len: usize) -> Option<&[Candle]> {
    if len == 0 || candles.len() < len {
        return None;
    }
    Some(&candles[candles.len() - len..])
}

fn score(condition: bool, weight: f64) -> f64 {
    if condition {
        weight
    } else {
        0.0
    }
}

fn max_by(candles: &[Candle], field: impl Fn(&Candle) -> f64) -> f64 {
    candles.iter().map(field).fold(f64::NEG_INFINITY, f64::max)
}

fn min_by(candles: &[Candle], field: impl Fn(&Candle) -> f64) -> f64 {
    candles.iter().map(field).fold(f64::INFINITY, f64::min)
}
