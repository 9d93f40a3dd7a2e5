/// Exact-integer check for values that crossed the native boundary as `f64`.
///
/// Returns the integer only if `value` is finite and survives rounding
/// unchanged. No epsilon: a value that is off by any amount is rejected.
pub fn exact_integer(value: f64) -> Option<i64> {
    if !value.is_finite() || value.round() != value {
        return None;
    }
    // 2^63 is exactly representable; anything at or beyond it does not fit.
    if value >= 9_223_372_036_854_775_808.0 || value < -9_223_372_036_854_775_808.0 {
        return None;
    }
    Some(value as i64)
}
