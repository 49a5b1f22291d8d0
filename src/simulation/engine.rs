// src/simulation/engine.rs
use crate::core::constants::cqze_constants::NORM_TOLERANCE;
use crate::core::{Outcome, Statevector};
use crate::operations::{Matrix2, Operation};
use crate::simulation::{Backend, Counts};
use crate::validation::check_normalization;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

/// Failures of the built-in single-qubit backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `statevector()` was requested after a measurement was attached.
    #[error("statevector is unavailable once a measurement is attached")]
    MeasurementAttached,

    /// `run()` was called without a measurement.
    #[error("cannot sample without a measurement; call add_measurement first")]
    MeasurementMissing,

    /// A gate was applied after the measurement.
    #[error("cannot apply {gate} after the measurement")]
    GateAfterMeasurement {
        /// Gate symbol
        gate: String,
    },

    /// The evolved state is no longer normalized.
    #[error("state lost normalization: {message}")]
    Denormalized {
        /// Validation failure message
        message: String,
    },
}

/// Exact statevector evolution of one qubit plus shot sampling.
///
/// The state starts in |H⟩. Gates act immediately; sampling draws
/// independent shots from the Born probabilities of the current state.
/// The random generator is created on the first `run`, so exact evolution
/// never touches it.
#[derive(Debug, Clone)]
pub struct StatevectorEngine {
    state: Statevector,
    measured: bool,
    seed: Option<u64>,
    gates_applied: u64,
    rng: Option<StdRng>,
}

impl StatevectorEngine {
    /// Creates an engine in |H⟩. `seed` makes sampling reproducible;
    /// `None` seeds from the operating system when sampling starts.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            state: Statevector::horizontal(),
            measured: false,
            seed,
            gates_applied: 0,
            rng: None,
        }
    }

    /// Engine for exact evolution only.
    pub fn exact() -> Self {
        Self::new(None)
    }

    /// Current state, regardless of whether a measurement is attached.
    pub fn state(&self) -> &Statevector {
        &self.state
    }

    /// Applies a unitary operation. `Measure` attaches the measurement instead.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), EngineError> {
        match op.matrix() {
            Some(matrix) => {
                if self.measured {
                    return Err(EngineError::GateAfterMeasurement { gate: op.symbol().to_string() });
                }
                self.apply_single_qubit_gate(&matrix);
                self.gates_applied += 1;
                Ok(())
            }
            None => {
                self.measured = true;
                Ok(())
            }
        }
    }

    /// Applies a 2x2 matrix: [psi_0', psi_1'] = matrix * [psi_0, psi_1]
    fn apply_single_qubit_gate(&mut self, matrix: &Matrix2) {
        let [psi_0, psi_1] = *self.state.amplitudes();
        let amplitudes = self.state.amplitudes_mut();
        amplitudes[0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
        amplitudes[1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
    }

    /// Allowed norm drift: one `NORM_TOLERANCE` per applied gate.
    fn norm_tolerance(&self) -> f64 {
        NORM_TOLERANCE * (1 + self.gates_applied) as f64
    }

    fn sample(&mut self, shots: u64) -> Result<Counts, EngineError> {
        check_normalization(&self.state, Some(self.norm_tolerance()))
            .map_err(|e| EngineError::Denormalized { message: e.to_string() })?;

        let p_v = self.state.weight(Outcome::V) / self.state.norm_sqr();
        debug!(shots, p_v, gates = self.gates_applied, seeded = self.seed.is_some(), "sampling statevector");

        let seed = self.seed;
        let rng = self.rng.get_or_insert_with(|| match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        });
        let mut counts = Counts::default();
        for _ in 0..shots {
            let r: f64 = rng.random(); // [0.0, 1.0)
            if r < p_v {
                counts.record(Outcome::V);
            } else {
                counts.record(Outcome::H);
            }
        }
        Ok(counts)
    }
}

impl Backend for StatevectorEngine {
    type Error = EngineError;

    fn apply_rotation(&mut self, angle: f64) -> Result<(), EngineError> {
        self.apply_operation(&Operation::Rotate { theta: angle })
    }

    fn apply_identity(&mut self) -> Result<(), EngineError> {
        self.apply_operation(&Operation::Identity)
    }

    fn apply_bitflip(&mut self) -> Result<(), EngineError> {
        self.apply_operation(&Operation::BitFlip)
    }

    fn add_measurement(&mut self) -> Result<(), EngineError> {
        self.apply_operation(&Operation::Measure)
    }

    fn run(&mut self, shots: u64) -> Result<Counts, EngineError> {
        if !self.measured {
            return Err(EngineError::MeasurementMissing);
        }
        self.sample(shots)
    }

    fn statevector(&self) -> Result<Statevector, EngineError> {
        if self.measured {
            return Err(EngineError::MeasurementAttached);
        }
        Ok(self.state)
    }
}

impl Default for StatevectorEngine {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Used by tests to start from an arbitrary state.
#[cfg(test)]
impl StatevectorEngine {
    pub(crate) fn set_state(&mut self, h: num_complex::Complex<f64>, v: num_complex::Complex<f64>) {
        self.state = Statevector::new(h, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use std::f64::consts::{FRAC_1_SQRT_2, PI};

    const TEST_TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_bitflip_maps_h_to_v() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::new(Some(7));
        engine.apply_bitflip()?;
        let psi = engine.statevector()?;
        assert!(psi.weight(Outcome::H) < TEST_TOLERANCE);
        assert!((psi.weight(Outcome::V) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_half_rotation_gives_equal_superposition() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::new(Some(7));
        engine.apply_rotation(PI / 2.0)?;
        let psi = engine.statevector()?;
        assert!((psi.amplitude(Outcome::H).re - FRAC_1_SQRT_2).abs() < TEST_TOLERANCE);
        assert!((psi.amplitude(Outcome::V).re - FRAC_1_SQRT_2).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_measurement_state_rules() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::new(Some(7));
        assert_eq!(engine.run(10), Err(EngineError::MeasurementMissing));
        engine.add_measurement()?;
        assert_eq!(engine.statevector(), Err(EngineError::MeasurementAttached));
        assert!(matches!(
            engine.apply_bitflip(),
            Err(EngineError::GateAfterMeasurement { .. })
        ));
        let counts = engine.run(100)?;
        assert_eq!(counts.get(Outcome::H), 100);
        Ok(())
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() -> Result<(), EngineError> {
        let mut a = StatevectorEngine::new(Some(42));
        let mut b = StatevectorEngine::new(Some(42));
        for engine in [&mut a, &mut b] {
            engine.apply_rotation(PI / 2.0)?;
            engine.add_measurement()?;
        }
        assert_eq!(a.run(500)?, b.run(500)?);
        Ok(())
    }

    #[test]
    fn test_exact_evolution_leaves_rng_unset() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::exact();
        engine.apply_rotation(PI / 3.0)?;
        let _ = engine.statevector()?;
        assert!(engine.rng.is_none());
        engine.add_measurement()?;
        engine.run(10)?;
        assert!(engine.rng.is_some());
        Ok(())
    }

    #[test]
    fn test_rounding_drift_after_many_gates_still_samples() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::new(Some(1));
        for _ in 0..10_000 {
            engine.apply_rotation(0.0)?;
        }
        // Drift well past a single-gate tolerance, within the accumulated one.
        let h = (1.0 - 2.5e-9f64).sqrt();
        engine.set_state(Complex::new(h, 0.0), Complex::new(0.0, 0.0));
        engine.add_measurement()?;
        let counts = engine.run(50)?;
        assert_eq!(counts.get(Outcome::H), 50);
        Ok(())
    }

    #[test]
    fn test_denormalized_state_is_rejected() -> Result<(), EngineError> {
        let mut engine = StatevectorEngine::new(Some(1));
        engine.set_state(Complex::new(1.0, 0.0), Complex::new(1.0, 0.0));
        engine.add_measurement()?;
        assert!(matches!(engine.run(10), Err(EngineError::Denormalized { .. })));
        Ok(())
    }
}
