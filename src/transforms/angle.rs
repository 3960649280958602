//! Angle arithmetic in degrees

/// Wrap an angle into `[0, 360)`.
///
/// Non-finite input (NaN, infinities) maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let normalized = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Signed shortest travel from `from` to `to`, in `[-180, 180]`.
///
/// A 350° -> 10° move is +20°, never -340°.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let mut delta = normalize_angle(to) - normalize_angle(from);
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}
