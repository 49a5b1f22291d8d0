// src/lib.rs

//! `cqze` - Chained Quantum Zeno Effect circuits for counterfactual communication
//!
//! Builds the nested-interferometer circuit for outer/inner cycle counts
//! `(M, N)` and Bob's boundary condition, predicts its leakage
//! `π² / (16·M²·N²)`, runs it on a single-qubit backend, and interprets the
//! detector statistics.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod prediction;
pub mod simulation;
pub mod interpret;
pub mod validation;
pub mod protocol;

// Re-export the most common types for easier top-level use
pub use crate::core::{BoundaryCondition, CqzeError, Outcome, ProtocolParameters, Statevector};
pub use operations::Operation;
pub use circuits::{build_sequence, CircuitBuilder, OperationSequence, Stage};
pub use prediction::{theoretical_distribution, theoretical_leak_probability, Prediction};
pub use simulation::{execute, state_evolution, Backend, Counts, Simulator, SimulatorConfig, StatevectorEngine};
pub use interpret::{classify, decode_bit, interpret, Classification, Observation, OutcomeDistribution};
pub use protocol::{Comparison, CounterfactualProtocol, ProtocolConfig, ScenarioReport};

// Example 1: Bob passes
// Forward and return halves cancel, so the photon returns to |H⟩ and
// detector D3 clicks every time.
/// ```
/// use cqze::{build_sequence, interpret, BoundaryCondition, CqzeError, Observation, Outcome, Simulator};
///
/// fn main() -> Result<(), CqzeError> {
///     let sequence = build_sequence(4, 4, BoundaryCondition::Pass, false)?;
///     let observation = Simulator::new().run(&sequence, 0)?;
///     assert!(matches!(observation, Observation::Statevector(_)));
///
///     let dist = interpret(&observation)?;
///     assert!((dist.probability(Outcome::H) - 1.0).abs() < 1e-9);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Bob blocks, sampled
// The flip at the midpoint breaks the cancellation and the photon leaves in |V⟩.
/// ```
/// use cqze::{BoundaryCondition, CounterfactualProtocol, CqzeError, ProtocolConfig, ProtocolParameters};
///
/// fn main() -> Result<(), CqzeError> {
///     let params = ProtocolParameters::new(4, 4)?;
///     let protocol = CounterfactualProtocol::new(params, ProtocolConfig::default().with_seed(7))?;
///     let report = protocol.run_scenario(BoundaryCondition::Block)?;
///     println!("{}", report);
///     assert!(report.decoded_correctly());
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = ();
