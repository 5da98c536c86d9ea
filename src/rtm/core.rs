//! Core layer RTM functions.

use crate::error::RtmError;

/// Compute `sinh(a) / sinh(b)` for `0 <= a <= b` and `b > 0`.
///
/// The direct quotient overflows to `inf / inf` once `b` passes ~710, which is
/// easily reached by thick snowpacks. Rewriting both terms relative to `e^b`
/// gives
///
/// sinh(a) / sinh(b) = e^(a - b) (1 - e^(-2a)) / (1 - e^(-2b))
///
/// which stays finite and tends to `e^(a - b)` for large arguments.
pub(crate) fn sinh_ratio(a: f64, b: f64) -> f64 {
    debug_assert!(b > 0.0 && a <= b);
    f64::exp(a - b) * (f64::exp_m1(-2.0 * a) / f64::exp_m1(-2.0 * b))
}

/// Escape function.
///
/// For a direction cosine `mu` in (0, 1], compute the angular distribution of
/// light escaping a semi-infinite, weakly absorbing medium,
///
/// u(mu) = 3/5 mu + (1 + sqrt(mu)) / 3
///
/// It's normalized so that `2 ∫ u(mu) mu dmu = 1` over (0, 1].
///
/// # References
///
/// A. A. Kokhanovsky, "Snow Optics", Springer, 2021, eq. 3.106.
pub fn escape_function(mu: f64) -> Result<f64, RtmError> {
    let mu = direction_cosine("mu", mu)?;
    Ok(0.6 * mu + (1.0 + mu.sqrt()) / 3.0)
}

/// Accept a finite, non-negative value.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, RtmError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(RtmError::invalid(name, value))
    }
}

/// Accept a finite, strictly positive value.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, RtmError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RtmError::invalid(name, value))
    }
}

/// Accept a value within the closed interval `[low, high]`. NaN is rejected.
pub(crate) fn within(
    name: &'static str,
    value: f64,
    low: f64,
    high: f64,
) -> Result<f64, RtmError> {
    if (low..=high).contains(&value) {
        Ok(value)
    } else {
        Err(RtmError::invalid(name, value))
    }
}

/// Accept a direction cosine in (0, 1].
pub(crate) fn direction_cosine(name: &'static str, value: f64) -> Result<f64, RtmError> {
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(RtmError::invalid(name, value))
    }
}
