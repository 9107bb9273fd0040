//! Decimal rounding for reported metrics.
//!
//! Values such as `0.4125` have no exact binary representation and land a
//! hair below the half-way point after scaling. A few-ULP correction is
//! applied before rounding half away from zero, so results match decimal
//! arithmetic on the intended value.

/// Decimal places for weights.
pub const WEIGHT_PLACES: u32 = 2;
/// Decimal places for CO2 and energy.
pub const FACTOR_PLACES: u32 = 3;

const ULP_CORRECTION: f64 = 4.0 * f64::EPSILON;

/// Round `value` to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    let corrected = scaled + scaled.abs() * ULP_CORRECTION * scaled.signum();
    corrected.round() / scale
}
