// src/protocol/mod.rs

//! End-to-end runs of the counterfactual communication protocol.
//!
//! A scenario builds the sequence for one boundary condition, samples it,
//! reads the exact final state, and classifies the result. Running both
//! scenarios shows that Alice can read Bob's bit from her detectors.

use crate::circuits::{CircuitBuilder, OperationSequence};
use crate::core::constants::cqze_constants::{DEFAULT_CLASSIFY_TOLERANCE, DEFAULT_SHOTS};
use crate::core::{BoundaryCondition, CqzeError, Outcome, ProtocolParameters, Statevector};
use crate::interpret::{classify, decode_bit, interpret, Classification, Observation, OutcomeDistribution};
use crate::prediction::Prediction;
use crate::simulation::{Counts, Simulator, SimulatorConfig};
use std::fmt;
use tracing::{info, warn};

/// Settings for a protocol run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolConfig {
    /// Measurement repetitions per scenario. Must be at least 1.
    pub shots: u64,
    /// Base sampling seed. BLOCK uses `seed + 1`. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Allowed deviation when classifying sampled distributions.
    pub tolerance: f64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
            tolerance: DEFAULT_CLASSIFY_TOLERANCE,
        }
    }
}

impl ProtocolConfig {
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn simulator_for(&self, boundary: BoundaryCondition) -> Simulator {
        let config = match self.seed {
            Some(seed) => SimulatorConfig::default().with_seed(seed.wrapping_add(u64::from(boundary.bit()))),
            None => SimulatorConfig::default(),
        };
        Simulator::with_config(config)
    }
}

/// Everything produced by one scenario.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub boundary: BoundaryCondition,
    /// The measured sequence that was sampled.
    pub sequence: OperationSequence,
    pub counts: Counts,
    /// Final state of the same circuit without measurement.
    pub final_state: Statevector,
    /// Distribution derived from `counts`.
    pub empirical: OutcomeDistribution,
    pub classification: Classification,
    /// Bob's bit as Alice decodes it from `empirical`.
    pub decoded: BoundaryCondition,
}

impl ScenarioReport {
    /// `true` if Alice decoded Bob's bit correctly.
    pub fn decoded_correctly(&self) -> bool {
        self.decoded == self.boundary
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.counts.get(Outcome::H);
        let v = self.counts.get(Outcome::V);
        writeln!(f, "Detection Results ({}):", self.boundary)?;
        writeln!(f, "  D₃ (|H⟩ = |0⟩): {} ({:.1}%)", h, self.empirical.percent(Outcome::H))?;
        writeln!(f, "  D₁/D₂ (|V⟩ = |1⟩): {} ({:.1}%)", v, self.empirical.percent(Outcome::V))?;
        writeln!(f, "Final state: {}", self.final_state)?;
        writeln!(
            f,
            "Expected: {} (max deviation {:.4}, {})",
            self.classification.expected,
            self.classification.max_deviation,
            if self.classification.consistent { "consistent" } else { "inconsistent" }
        )?;
        writeln!(f, "Decoded bit: {} ({})", self.decoded.bit(), self.decoded)
    }
}

/// Both scenarios for one parameter set.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub prediction: Prediction,
    pub pass: ScenarioReport,
    pub block: ScenarioReport,
}

impl Comparison {
    /// `true` if both of Bob's bits were decoded correctly.
    pub fn bits_recovered(&self) -> bool {
        self.pass.decoded_correctly() && self.block.decoded_correctly()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Parameters:")?;
        write!(f, "{}", self.prediction)?;
        writeln!(f)?;
        writeln!(f, "SCENARIO 1: Bob's switch is OFF (Bob passes photon back)")?;
        write!(f, "{}", self.pass)?;
        writeln!(f)?;
        writeln!(f, "SCENARIO 2: Bob's switch is ON (Bob blocks photon)")?;
        write!(f, "{}", self.block)?;
        writeln!(f)?;
        writeln!(f, "Circuit (Bob passes, bit=0):")?;
        write!(f, "{}", self.pass.sequence)?;
        writeln!(f, "Circuit (Bob blocks, bit=1):")?;
        write!(f, "{}", self.block.sequence)
    }
}

/// The protocol for one parameter set.
#[derive(Debug, Clone, Copy)]
pub struct CounterfactualProtocol {
    params: ProtocolParameters,
    config: ProtocolConfig,
}

impl CounterfactualProtocol {
    /// # Errors
    /// `CqzeError::InvalidParameter` if `config.shots` is zero or
    /// `config.tolerance` is negative or NaN.
    pub fn new(params: ProtocolParameters, config: ProtocolConfig) -> Result<Self, CqzeError> {
        if config.shots == 0 {
            return Err(CqzeError::invalid_parameter("shots must be >= 1"));
        }
        if config.tolerance.is_nan() || config.tolerance < 0.0 {
            return Err(CqzeError::invalid_parameter(format!(
                "tolerance must be >= 0, got {}",
                config.tolerance
            )));
        }
        Ok(Self { params, config })
    }

    pub fn params(&self) -> ProtocolParameters {
        self.params
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn prediction(&self) -> Prediction {
        Prediction::new(self.params)
    }

    /// Runs a single scenario.
    pub fn run_scenario(&self, boundary: BoundaryCondition) -> Result<ScenarioReport, CqzeError> {
        let simulator = self.config.simulator_for(boundary);
        let sequence = CircuitBuilder::new(self.params, boundary)
            .with_measurement(true)
            .build();

        let counts = match simulator.run(&sequence, self.config.shots)? {
            Observation::Counts(counts) => counts,
            Observation::Statevector(_) => {
                return Err(CqzeError::malformed_input("measured sequence returned no counts"));
            }
        };
        let final_state = simulator.final_state(&sequence)?;
        let empirical = interpret(&Observation::Counts(counts))?;
        let classification = classify(&empirical, boundary, &self.params, self.config.tolerance)?;
        let decoded = decode_bit(&empirical, &self.params)?;

        info!(
            params = %self.params,
            boundary = %boundary,
            shots = self.config.shots,
            p_h = empirical.probability(Outcome::H),
            p_v = empirical.probability(Outcome::V),
            decoded = %decoded,
            "scenario complete"
        );
        if !classification.consistent {
            warn!(
                boundary = %boundary,
                max_deviation = classification.max_deviation,
                tolerance = self.config.tolerance,
                "sampled distribution deviates from expectation"
            );
        }

        Ok(ScenarioReport {
            boundary,
            sequence,
            counts,
            final_state,
            empirical,
            classification,
            decoded,
        })
    }

    /// Runs PASS then BLOCK.
    pub fn run_both(&self) -> Result<Comparison, CqzeError> {
        Ok(Comparison {
            prediction: self.prediction(),
            pass: self.run_scenario(BoundaryCondition::Pass)?,
            block: self.run_scenario(BoundaryCondition::Block)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_shots_rejected() -> Result<(), CqzeError> {
        let params = ProtocolParameters::new(4, 4)?;
        let err = CounterfactualProtocol::new(params, ProtocolConfig::default().with_shots(0));
        assert!(matches!(err, Err(CqzeError::InvalidParameter { .. })));
        Ok(())
    }

    #[test]
    fn test_bad_tolerance_rejected() -> Result<(), CqzeError> {
        let params = ProtocolParameters::new(4, 4)?;
        for tolerance in [f64::NAN, -0.01] {
            let err = CounterfactualProtocol::new(params, ProtocolConfig::default().with_tolerance(tolerance));
            assert!(matches!(err, Err(CqzeError::InvalidParameter { .. })));
        }
        assert!(CounterfactualProtocol::new(params, ProtocolConfig::default().with_tolerance(0.0)).is_ok());
        Ok(())
    }

    #[test]
    fn test_seeded_runs_repeat() -> Result<(), CqzeError> {
        let params = ProtocolParameters::new(3, 5)?;
        let config = ProtocolConfig::default().with_shots(200).with_seed(11);
        let protocol = CounterfactualProtocol::new(params, config)?;
        let a = protocol.run_scenario(BoundaryCondition::Block)?;
        let b = protocol.run_scenario(BoundaryCondition::Block)?;
        assert_eq!(a.counts, b.counts);
        assert_eq!(a.sequence, b.sequence);
        Ok(())
    }

    #[test]
    fn test_report_text() -> Result<(), CqzeError> {
        let params = ProtocolParameters::new(4, 4)?;
        let protocol = CounterfactualProtocol::new(params, ProtocolConfig::default().with_seed(3))?;
        let comparison = protocol.run_both()?;
        let text = comparison.to_string();
        assert!(text.contains("Theoretical leakage: 0.241%"));
        assert!(text.contains("D₃ (|H⟩ = |0⟩): 1000 (100.0%)"));
        assert!(text.contains("D₁/D₂ (|V⟩ = |1⟩): 1000 (100.0%)"));
        assert!(comparison.bits_recovered());
        Ok(())
    }
}
