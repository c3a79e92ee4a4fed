/// Configuration parameters for chart pattern detection
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Trailing candles inspected for an ascending triangle
    pub triangle_window: usize,
    /// Max distance of a high from resistance to count as a touch (fraction of resistance)
    pub touch_tolerance: f64,
    /// Touches needed for a flat resistance
    pub min_touches: usize,
    /// Trailing candles inspected for a cup and handle
    pub cup_window: usize,
    /// Trailing candles forming the handle
    pub handle_len: usize,
    /// Max handle range as a fraction of the cup's close range
    pub max_handle_ratio: f64,
    /// Minimum score for a pattern to be reported
    pub min_confidence: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            triangle_window: 20,
            touch_tolerance: 0.005,
            min_touches: 3,
            cup_window: 30,
            handle_len: 5,
            max_handle_ratio: 0.3,
            min_confidence: 90.0,
        }
    }
}
