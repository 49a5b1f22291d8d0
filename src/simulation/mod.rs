// src/simulation/mod.rs

//! Executes operation sequences on a single-qubit backend.
//!
//! The [`Backend`] trait is the seam to any circuit execution service. The
//! crate ships [`StatevectorEngine`], an exact one-qubit backend, and the
//! [`Simulator`] entry point that creates a fresh engine per run.

mod results;
pub mod engine;

pub use engine::{EngineError, StatevectorEngine};
pub use results::Counts;

use crate::circuits::{CircuitBuilder, OperationSequence};
use crate::core::{BoundaryCondition, CqzeError, ProtocolParameters, Statevector};
use crate::interpret::{interpret, Observation, OutcomeDistribution};
use crate::operations::Operation;

/// A quantum-circuit execution backend for one qubit.
///
/// Calls arrive in sequence order. Implementations report their own failures
/// through `Error`; callers see them as `CqzeError::CollaboratorFailure`.
pub trait Backend {
    /// Backend-specific failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Applies a Y-axis rotation by `angle` radians.
    fn apply_rotation(&mut self, angle: f64) -> Result<(), Self::Error>;

    /// Applies the no-op midpoint action.
    fn apply_identity(&mut self) -> Result<(), Self::Error>;

    /// Applies the H ↔ V flip.
    fn apply_bitflip(&mut self) -> Result<(), Self::Error>;

    /// Marks the circuit for computational-basis sampling.
    fn add_measurement(&mut self) -> Result<(), Self::Error>;

    /// Executes the assembled circuit `shots` times.
    fn run(&mut self, shots: u64) -> Result<Counts, Self::Error>;

    /// Exact final state; only available when no measurement is attached.
    fn statevector(&self) -> Result<Statevector, Self::Error>;
}

/// Drives `backend` through `sequence`.
///
/// Returns sampled counts if the sequence ends in `Measure`, the exact
/// statevector otherwise. Backend errors are wrapped, never retried.
pub fn execute<B: Backend>(
    sequence: &OperationSequence,
    backend: &mut B,
    shots: u64,
) -> Result<Observation, CqzeError> {
    for op in sequence.operations() {
        let step = match op {
            Operation::Rotate { theta } => backend.apply_rotation(*theta),
            Operation::Identity => backend.apply_identity(),
            Operation::BitFlip => backend.apply_bitflip(),
            Operation::Measure => backend.add_measurement(),
        };
        step.map_err(CqzeError::collaborator)?;
    }

    if sequence.has_measurement() {
        let counts = backend.run(shots).map_err(CqzeError::collaborator)?;
        Ok(Observation::Counts(counts))
    } else {
        let state = backend.statevector().map_err(CqzeError::collaborator)?;
        Ok(Observation::Statevector(state))
    }
}

/// Simulator configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Seed for shot sampling. `None` seeds each run from the OS.
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Runs sequences on a fresh [`StatevectorEngine`] each time.
///
/// Holds no state between runs, so PASS and BLOCK may run concurrently.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs a sequence. `shots` is ignored when the sequence has no measurement.
    ///
    /// # Returns
    /// * `Ok(Observation::Counts)` for measured sequences.
    /// * `Ok(Observation::Statevector)` otherwise.
    /// * `Err(CqzeError::CollaboratorFailure)` if the engine fails.
    pub fn run(&self, sequence: &OperationSequence, shots: u64) -> Result<Observation, CqzeError> {
        let mut engine = StatevectorEngine::new(self.config.seed);
        execute(sequence, &mut engine, shots)
    }

    /// Final statevector of `sequence`, skipping any measurement step.
    pub fn final_state(&self, sequence: &OperationSequence) -> Result<Statevector, CqzeError> {
        let mut engine = StatevectorEngine::exact();
        for op in sequence.operations().iter().filter(|op| **op != Operation::Measure) {
            engine.apply_operation(op).map_err(CqzeError::collaborator)?;
        }
        Ok(*engine.state())
    }
}

/// Statevector before the first operation and after every unitary operation.
///
/// The trace has `1 + 2·(M+N) + 1` entries; a trailing `Measure` adds none.
pub fn state_evolution(sequence: &OperationSequence) -> Result<Vec<Statevector>, CqzeError> {
    let mut engine = StatevectorEngine::exact();
    let mut states = Vec::with_capacity(sequence.len() + 1);
    states.push(*engine.state());
    for op in sequence.operations().iter().filter(|op| **op != Operation::Measure) {
        engine.apply_operation(op).map_err(CqzeError::collaborator)?;
        states.push(*engine.state());
    }
    Ok(states)
}

/// Exact outcome distribution of the noiseless circuit for `boundary`.
pub fn exact_distribution(
    params: &ProtocolParameters,
    boundary: BoundaryCondition,
) -> Result<OutcomeDistribution, CqzeError> {
    let sequence = CircuitBuilder::new(*params, boundary).build();
    let state = Simulator::new().final_state(&sequence)?;
    interpret(&Observation::Statevector(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::build_sequence;
    use crate::core::Outcome;

    const TEST_TOLERANCE: f64 = 1e-9;

    /// Backend that fails on the first bit-flip.
    #[derive(Default)]
    struct FlakyBackend {
        calls: usize,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("backend exhausted after {0} calls")]
    struct Exhausted(usize);

    impl Backend for FlakyBackend {
        type Error = Exhausted;

        fn apply_rotation(&mut self, _angle: f64) -> Result<(), Exhausted> {
            self.calls += 1;
            Ok(())
        }
        fn apply_identity(&mut self) -> Result<(), Exhausted> {
            self.calls += 1;
            Ok(())
        }
        fn apply_bitflip(&mut self) -> Result<(), Exhausted> {
            Err(Exhausted(self.calls))
        }
        fn add_measurement(&mut self) -> Result<(), Exhausted> {
            Ok(())
        }
        fn run(&mut self, shots: u64) -> Result<Counts, Exhausted> {
            Ok(Counts::new(shots, 0))
        }
        fn statevector(&self) -> Result<Statevector, Exhausted> {
            Ok(Statevector::horizontal())
        }
    }

    #[test]
    fn test_backend_failure_is_propagated_unchanged() -> Result<(), CqzeError> {
        let sequence = build_sequence(2, 2, BoundaryCondition::Block, true)?;
        let mut backend = FlakyBackend::default();
        match execute(&sequence, &mut backend, 100) {
            Err(CqzeError::CollaboratorFailure { source }) => {
                let inner = source.downcast_ref::<Exhausted>().expect("original error type");
                assert_eq!(inner.0, 4);
            }
            other => panic!("expected CollaboratorFailure, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_execute_pass_with_custom_backend() -> Result<(), CqzeError> {
        let sequence = build_sequence(2, 2, BoundaryCondition::Pass, true)?;
        let mut backend = FlakyBackend::default();
        let observation = execute(&sequence, &mut backend, 64)?;
        assert_eq!(observation, Observation::Counts(Counts::new(64, 0)));
        assert_eq!(backend.calls, 9);
        Ok(())
    }

    #[test]
    fn test_state_evolution_length_and_endpoints() -> Result<(), CqzeError> {
        let sequence = build_sequence(3, 2, BoundaryCondition::Pass, true)?;
        let states = state_evolution(&sequence)?;
        assert_eq!(states.len(), 1 + 2 * (3 + 2) + 1);
        assert_eq!(states[0], Statevector::horizontal());
        // Forward halves end in |V⟩.
        assert!((states[3 + 2].weight(Outcome::V) - 1.0).abs() < TEST_TOLERANCE);
        let last = states[states.len() - 1];
        assert!((last.weight(Outcome::H) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_exact_distribution_per_boundary() -> Result<(), CqzeError> {
        let params = ProtocolParameters::new(4, 4)?;
        let pass = exact_distribution(&params, BoundaryCondition::Pass)?;
        let block = exact_distribution(&params, BoundaryCondition::Block)?;
        assert!((pass.probability(Outcome::H) - 1.0).abs() < TEST_TOLERANCE);
        assert!((block.probability(Outcome::V) - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_unmeasured_run_returns_statevector() -> Result<(), CqzeError> {
        let sequence = build_sequence(1, 1, BoundaryCondition::Pass, false)?;
        let observation = Simulator::new().run(&sequence, 1000)?;
        assert!(matches!(observation, Observation::Statevector(_)));
        Ok(())
    }
}
