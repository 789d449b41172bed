//! Shared numeric helpers for hour arithmetic and interpolation.

/// Wrap an hour value into [0, 24).
///
/// Negative and overflowing inputs normalize via Euclidean modulo, so
/// `wrap24(-1.5)` is `22.5` and `wrap24(25.0)` is `1.0`.
pub fn wrap24(hour: f64) -> f64 {
    let wrapped = hour.rem_euclid(24.0);
    // rem_euclid can return exactly 24.0 for tiny negative inputs
    if wrapped >= 24.0 { 0.0 } else { wrapped }
}

/// Forward distance in hours from `from` to `to` on the 24-hour circle.
///
/// Always in [0, 24). Used for membership tests in windows that may cross
/// midnight.
pub fn forward_hours(from: f64, to: f64) -> f64 {
    wrap24(to - from)
}

/// Test whether `hour` lies in the half-open wrapped range `[start, end)`.
///
/// When `start == end` the range is considered empty.
pub fn in_wrapped_range(hour: f64, start: f64, end: f64) -> bool {
    let span = forward_hours(start, end);
    if span == 0.0 {
        return false;
    }
    forward_hours(start, hour) < span
}

/// Linear interpolation between two f64 values.
pub fn interpolate_f64(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
