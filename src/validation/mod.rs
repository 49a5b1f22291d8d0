// src/validation/mod.rs

//! Provides functions to validate statevectors and outcome distributions.

use crate::core::constants::cqze_constants::NORM_TOLERANCE;
use crate::core::{CqzeError, Outcome, Statevector};
use crate::interpret::OutcomeDistribution;

/// Checks if the statevector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `Statevector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to 1e-9.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(CqzeError::MalformedInput)` otherwise, including non-finite amplitudes.
pub fn check_normalization(state: &Statevector, tolerance: Option<f64>) -> Result<(), CqzeError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if !norm_sq.is_finite() || (norm_sq - 1.0).abs() > effective_tolerance {
        Err(CqzeError::malformed_input(format!(
            "Statevector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Checks that every probability lies in [0, 1] and that they sum to 1.
///
/// # Returns
/// * `Ok(())` if the distribution is valid within tolerance (default 1e-9).
/// * `Err(CqzeError::MalformedInput)` otherwise.
pub fn check_distribution(dist: &OutcomeDistribution, tolerance: Option<f64>) -> Result<(), CqzeError> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    for outcome in Outcome::ALL {
        let p = dist.probability(outcome);
        if !p.is_finite() || p < -effective_tolerance || p > 1.0 + effective_tolerance {
            return Err(CqzeError::malformed_input(format!(
                "P({}) = {} is not a probability",
                outcome.label(),
                p
            )));
        }
    }
    let total = dist.total();
    if (total - 1.0).abs() > effective_tolerance {
        return Err(CqzeError::malformed_input(format!(
            "Probabilities sum to {} (Deviation > {})",
            total, effective_tolerance
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_normalized_superposition_passes() {
        let psi = Statevector::new(Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(0.0, FRAC_1_SQRT_2));
        assert!(check_normalization(&psi, None).is_ok());
    }

    #[test]
    fn test_unnormalized_state_fails() {
        let psi = Statevector::new(Complex::new(1.0, 0.0), Complex::new(1.0, 0.0));
        assert!(matches!(
            check_normalization(&psi, None),
            Err(CqzeError::MalformedInput { .. })
        ));
        let nan = Statevector::new(Complex::new(f64::NAN, 0.0), Complex::new(0.0, 0.0));
        assert!(check_normalization(&nan, Some(1.0)).is_err());
    }

    #[test]
    fn test_distribution_bounds() {
        assert!(check_distribution(&OutcomeDistribution::from_parts(0.25, 0.75), None).is_ok());
        assert!(check_distribution(&OutcomeDistribution::from_parts(0.5, 0.6), None).is_err());
        assert!(check_distribution(&OutcomeDistribution::from_parts(1.5, -0.5), None).is_err());
    }
}
