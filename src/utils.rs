//! Shared utility functions for the rain hazard service

/// Round a value to a fixed number of decimal places, resolving ties to the even digit
///
/// The composite matrix has always been rounded the way tabular tooling rounds
/// (half-to-even), so `0.00005` at 4 places becomes `0.0` and `0.00015` becomes `0.0002`.
///
/// # Examples
///
/// ```
/// use rain_hazard_service::utils::round_to;
///
/// assert_eq!(round_to(0.123456, 4), 0.1235);
/// assert_eq!(round_to(152.5, 0), 152.0);
/// assert_eq!(round_to(12.345678, 2), 12.35);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places as i32);
    normalize_zero((value * scale).round_ties_even() / scale)
}

/// Normalize -0.0 to 0.0 for cleaner tables and API responses
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0 // Converts both 0.0 and -0.0 to 0.0
    } else {
        value
    }
}

/// Population mean and standard deviation (divisor `n`, not `n - 1`)
///
/// Returns `None` for an empty slice.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}
