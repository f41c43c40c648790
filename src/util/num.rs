/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Formats a float the way Sapp prints it.
///
/// Whole floats keep one decimal place so an integer result and a float
/// result never render the same.
///
/// ## Parameters
/// - `value`: The float to format.
///
/// ## Returns
/// The rendered text, e.g. `5.0` rather than `5`.
///
/// ## Example
/// ```
/// use sapp::util::num::format_float;
///
/// assert_eq!(format_float(2.5), "2.5");
/// assert_eq!(format_float(4.0), "4.0");
/// ```
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Converts an `i64` to `f64`, accepting precision loss.
///
/// Values beyond [`MAX_SAFE_I64_INT`] in magnitude round to the nearest
/// representable float. Sapp prefers an imprecise float over a fault
/// here because the same degradation already happens when an oversized
/// literal is lexed.
///
/// ## Example
/// ```
/// use sapp::util::num::int_to_float;
///
/// assert_eq!(int_to_float(42), 42.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}
