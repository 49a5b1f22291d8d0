// src/interpret/mod.rs

//! Turns shot counts or statevectors into outcome distributions and
//! compares them with what each boundary condition should produce.

use crate::core::constants::cqze_constants::NORM_TOLERANCE;
use crate::core::{BoundaryCondition, CqzeError, Outcome, ProtocolParameters, Statevector};
use crate::prediction::theoretical_distribution;
use crate::simulation::{exact_distribution, Counts};
use crate::validation::check_distribution;
use std::fmt;

/// Raw result of one backend execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation {
    /// Sampled detections.
    Counts(Counts),
    /// Exact final state of an unmeasured circuit.
    Statevector(Statevector),
}

/// Probability of each basis outcome. Both values are in [0, 1] and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeDistribution {
    /// Indexed by `Outcome::bit()`.
    probabilities: [f64; 2],
}

impl OutcomeDistribution {
    pub(crate) fn from_parts(p_h: f64, p_v: f64) -> Self {
        Self { probabilities: [p_h, p_v] }
    }

    pub fn probability(&self, outcome: Outcome) -> f64 {
        self.probabilities[outcome.bit()]
    }

    pub fn percent(&self, outcome: Outcome) -> f64 {
        100.0 * self.probability(outcome)
    }

    /// Sum of both probabilities.
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Largest absolute per-outcome difference from `other`.
    pub fn max_deviation(&self, other: &OutcomeDistribution) -> f64 {
        Outcome::ALL
            .iter()
            .map(|o| (self.probability(*o) - other.probability(*o)).abs())
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for OutcomeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P(H)={:.4}, P(V)={:.4}",
            self.probability(Outcome::H),
            self.probability(Outcome::V)
        )
    }
}

/// Normalizes an observation into an [`OutcomeDistribution`].
///
/// # Errors
/// `CqzeError::MalformedInput` if the counts total zero shots, if the
/// statevector has zero or non-finite norm, or if the result does not sum
/// to 1 within 1e-9.
pub fn interpret(observation: &Observation) -> Result<OutcomeDistribution, CqzeError> {
    let dist = match observation {
        Observation::Counts(counts) => {
            let total = counts.total();
            if total == 0 {
                return Err(CqzeError::malformed_input("total shots is zero"));
            }
            let total = total as f64;
            OutcomeDistribution::from_parts(
                counts.get(Outcome::H) as f64 / total,
                counts.get(Outcome::V) as f64 / total,
            )
        }
        Observation::Statevector(state) => {
            let norm_sq = state.norm_sqr();
            if !norm_sq.is_finite() || norm_sq <= 0.0 {
                return Err(CqzeError::malformed_input(format!(
                    "statevector cannot be normalized (|psi|^2 = {})",
                    norm_sq
                )));
            }
            OutcomeDistribution::from_parts(
                state.weight(Outcome::H) / norm_sq,
                state.weight(Outcome::V) / norm_sq,
            )
        }
    };
    check_distribution(&dist, Some(NORM_TOLERANCE))?;
    Ok(dist)
}

/// Comparison of an observed distribution with a boundary's expectation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub boundary: BoundaryCondition,
    /// Exact distribution of the noiseless circuit for `boundary`.
    pub expected: OutcomeDistribution,
    pub observed: OutcomeDistribution,
    /// Largest per-outcome deviation between observed and expected.
    pub max_deviation: f64,
    /// `max_deviation <= tolerance`
    pub consistent: bool,
    /// For PASS only: whether observed P(V) stays within `P_leak + tolerance`.
    pub within_leak_bound: Option<bool>,
}

/// Classifies `observed` against the expectation for `boundary`.
///
/// Informational only: sampled output carries statistical noise, so an
/// inconsistent result is reported, not raised as an error.
pub fn classify(
    observed: &OutcomeDistribution,
    boundary: BoundaryCondition,
    params: &ProtocolParameters,
    tolerance: f64,
) -> Result<Classification, CqzeError> {
    let expected = exact_distribution(params, boundary)?;
    let max_deviation = observed.max_deviation(&expected);
    let within_leak_bound = match boundary {
        BoundaryCondition::Pass => {
            let bound = theoretical_distribution(params).probability(Outcome::V);
            Some(observed.probability(Outcome::V) <= bound + tolerance)
        }
        BoundaryCondition::Block => None,
    };
    Ok(Classification {
        boundary,
        expected,
        observed: *observed,
        max_deviation,
        consistent: max_deviation <= tolerance,
        within_leak_bound,
    })
}

/// The boundary condition Alice infers from `observed`: whichever expected
/// distribution lies closer. Ties decode as PASS.
pub fn decode_bit(
    observed: &OutcomeDistribution,
    params: &ProtocolParameters,
) -> Result<BoundaryCondition, CqzeError> {
    let pass = observed.max_deviation(&exact_distribution(params, BoundaryCondition::Pass)?);
    let block = observed.max_deviation(&exact_distribution(params, BoundaryCondition::Block)?);
    if block < pass {
        Ok(BoundaryCondition::Block)
    } else {
        Ok(BoundaryCondition::Pass)
    }
}
