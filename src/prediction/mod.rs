// src/prediction/mod.rs

//! Closed-form leakage model for the chained Zeno protocol.
//!
//! The probability that the photon is found in the forbidden channel is
//! `P_leak = π² / (16·M²·N²)`. It is strictly decreasing in both cycle
//! counts and tends to 0 as either grows, but it is not small for tiny
//! inputs (≈0.617 at M = N = 1).

use crate::core::{CqzeError, ProtocolParameters};
use crate::interpret::OutcomeDistribution;
use std::fmt;

/// Leakage probability for raw `(M, N)` values.
///
/// # Errors
/// `CqzeError::InvalidParameter` if `m < 1` or `n < 1`, same as the builder.
pub fn theoretical_leak_probability(m: u32, n: u32) -> Result<f64, CqzeError> {
    Ok(ProtocolParameters::new(m, n)?.leak_probability())
}

/// The theoretical outcome distribution: `V` with `P_leak`, `H` otherwise.
pub fn theoretical_distribution(params: &ProtocolParameters) -> OutcomeDistribution {
    let leak = params.leak_probability();
    OutcomeDistribution::from_parts(1.0 - leak, leak)
}

/// Parameter summary printed alongside simulation results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// The parameters the prediction was made for.
    pub params: ProtocolParameters,
    /// θ_M in radians.
    pub theta_m: f64,
    /// θ_N in radians.
    pub theta_n: f64,
    /// π² / (16·M²·N²)
    pub leak_probability: f64,
}

impl Prediction {
    pub fn new(params: ProtocolParameters) -> Self {
        Self {
            params,
            theta_m: params.theta_m(),
            theta_n: params.theta_n(),
            leak_probability: params.leak_probability(),
        }
    }

    /// Leakage as a percentage.
    pub fn leak_percent(&self) -> f64 {
        100.0 * self.leak_probability
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  M (outer cycles): {}", self.params.m())?;
        writeln!(f, "  N (inner cycles): {}", self.params.n())?;
        writeln!(
            f,
            "  θ_M = π/{} = {:.2}°",
            4 * self.params.m(),
            self.theta_m.to_degrees()
        )?;
        writeln!(
            f,
            "  θ_N = π/{} = {:.2}°",
            4 * self.params.n(),
            self.theta_n.to_degrees()
        )?;
        writeln!(f, "  Theoretical leakage: {:.3}%", self.leak_percent())
    }
}
