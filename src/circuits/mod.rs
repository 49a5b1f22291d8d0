// src/circuits/mod.rs

//! Builds the chained-Zeno operation sequence from `(M, N, boundary)`.
//!
//! The sequence is an outer forward half, an inner forward half, Bob's
//! midpoint action, and the two return halves as adjoints in reverse order:
//!
//! ```text
//! |H⟩ ─ RY(2θ_M)^M ─ RY(2θ_N)^N ─ I/X ─ RY(−2θ_N)^N ─ RY(−2θ_M)^M ─ [M]
//! ```

use crate::core::{BoundaryCondition, CqzeError, ProtocolParameters};
use crate::operations::Operation;
use std::fmt;
use tracing::debug;

/// The part of the protocol an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Alice's interferometer, forward.
    OuterForward,
    /// Transmission channel, forward.
    InnerForward,
    /// Bob's switch.
    Midpoint,
    /// Transmission channel, return path.
    InnerReturn,
    /// Alice's interferometer, return path.
    OuterReturn,
    /// Detection at D1/D2/D3.
    Measurement,
}

/// An ordered, immutable list of single-qubit operations for one protocol run.
///
/// Built once per invocation and consumed by a backend; there is no API to
/// modify it after [`CircuitBuilder::build`].
#[derive(Clone, PartialEq)]
pub struct OperationSequence {
    params: ProtocolParameters,
    boundary: BoundaryCondition,
    /// Stage tag for each entry of `operations`, same length.
    stages: Vec<Stage>,
    operations: Vec<Operation>,
}

impl OperationSequence {
    /// Parameters the sequence was built from.
    pub fn params(&self) -> ProtocolParameters {
        self.params
    }

    /// Boundary condition the sequence was built for.
    pub fn boundary(&self) -> BoundaryCondition {
        self.boundary
    }

    /// Returns a slice containing the ordered operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Stage of each operation, index-aligned with [`operations`](Self::operations).
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Iterates over `(stage, operation)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Operation)> {
        self.stages.iter().copied().zip(self.operations.iter())
    }

    /// Operations tagged with `stage`, in order.
    pub fn stage_operations(&self, stage: Stage) -> Vec<Operation> {
        self.iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, op)| *op)
            .collect()
    }

    /// Number of `Rotate` steps; always `2·(M+N)`.
    pub fn rotation_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_rotation()).count()
    }

    /// The midpoint action (`Identity` or `BitFlip`).
    pub fn midpoint_action(&self) -> Option<Operation> {
        self.stage_operations(Stage::Midpoint).first().copied()
    }

    /// `true` if the sequence ends with a computational-basis measurement.
    pub fn has_measurement(&self) -> bool {
        matches!(self.operations.last(), Some(Operation::Measure))
    }

    /// Returns the total number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the sequence contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    fn push(&mut self, stage: Stage, op: Operation) {
        self.stages.push(stage);
        self.operations.push(op);
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Assembles the [`OperationSequence`] for one `(M, N, boundary)` triple.
///
/// ```
/// use cqze::{BoundaryCondition, CircuitBuilder, ProtocolParameters};
///
/// let params = ProtocolParameters::new(4, 4).unwrap();
/// let sequence = CircuitBuilder::new(params, BoundaryCondition::Block)
///     .with_measurement(true)
///     .build();
/// assert_eq!(sequence.rotation_count(), 16);
/// assert!(sequence.has_measurement());
/// ```
pub struct CircuitBuilder {
    params: ProtocolParameters,
    boundary: BoundaryCondition,
    include_measurement: bool,
}

impl CircuitBuilder {
    /// Creates a builder. Measurement is omitted unless requested.
    pub fn new(params: ProtocolParameters, boundary: BoundaryCondition) -> Self {
        Self {
            params,
            boundary,
            include_measurement: false,
        }
    }

    /// Appends a final `Measure` step when `include` is true.
    ///
    /// Sequences for statevector inspection omit it; sequences for sampling include it.
    pub fn with_measurement(mut self, include: bool) -> Self {
        self.include_measurement = include;
        self
    }

    /// Finalizes the construction process and returns the built sequence.
    pub fn build(self) -> OperationSequence {
        let m = self.params.m() as usize;
        let n = self.params.n() as usize;
        let outer_step = 2.0 * self.params.theta_m();
        let inner_step = 2.0 * self.params.theta_n();

        let capacity = 2 * (m + n) + 2;
        let mut sequence = OperationSequence {
            params: self.params,
            boundary: self.boundary,
            stages: Vec::with_capacity(capacity),
            operations: Vec::with_capacity(capacity),
        };

        for _ in 0..m {
            sequence.push(Stage::OuterForward, Operation::Rotate { theta: outer_step });
        }
        for _ in 0..n {
            sequence.push(Stage::InnerForward, Operation::Rotate { theta: inner_step });
        }
        let forward_len = sequence.len();
        sequence.push(Stage::Midpoint, self.boundary.midpoint());

        // Return path: adjoints of the forward rotations, last one first.
        for index in (0..forward_len).rev() {
            let stage = match sequence.stages[index] {
                Stage::InnerForward => Stage::InnerReturn,
                _ => Stage::OuterReturn,
            };
            if let Some(undo) = sequence.operations[index].adjoint() {
                sequence.push(stage, undo);
            }
        }
        if self.include_measurement {
            sequence.push(Stage::Measurement, Operation::Measure);
        }

        debug!(
            m = self.params.m(),
            n = self.params.n(),
            boundary = %self.boundary,
            measured = self.include_measurement,
            operations = sequence.len(),
            "built chained-zeno sequence"
        );
        sequence
    }
}

/// Builds the sequence for raw `(M, N)` values.
///
/// # Errors
/// `CqzeError::InvalidParameter` if `m < 1` or `n < 1`.
pub fn build_sequence(
    m: u32,
    n: u32,
    boundary: BoundaryCondition,
    include_measurement: bool,
) -> Result<OperationSequence, CqzeError> {
    let params = ProtocolParameters::new(m, n)?;
    Ok(CircuitBuilder::new(params, boundary)
        .with_measurement(include_measurement)
        .build())
}

impl fmt::Display for OperationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const GATE_WIDTH: usize = 6; // e.g., "──RY──"
        const H_WIRE: char = '─';

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        writeln!(
            f,
            "cqze::OperationSequence[{}, boundary={}, {} operations]",
            self.params,
            self.boundary,
            self.len()
        )?;
        let wire: String = self.operations.iter().map(|op| format_gate(op.symbol())).collect();
        writeln!(f, "photon: {}", wire)?;
        writeln!(
            f,
            "        RY(θ) outer = {:+.4} rad, inner = {:+.4} rad; RY† negates",
            2.0 * self.params.theta_m(),
            2.0 * self.params.theta_n()
        )
    }
}

impl fmt::Debug for OperationSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_layout() -> Result<(), CqzeError> {
        let sequence = build_sequence(2, 3, BoundaryCondition::Pass, true)?;
        assert_eq!(sequence.len(), 2 * (2 + 3) + 2);
        assert_eq!(sequence.stage_operations(Stage::OuterForward).len(), 2);
        assert_eq!(sequence.stage_operations(Stage::InnerForward).len(), 3);
        assert_eq!(sequence.stage_operations(Stage::InnerReturn).len(), 3);
        assert_eq!(sequence.stage_operations(Stage::OuterReturn).len(), 2);
        assert_eq!(sequence.stages().len(), sequence.operations().len());
        assert_eq!(sequence.stages()[sequence.len() - 1], Stage::Measurement);
        Ok(())
    }

    #[test]
    fn test_return_half_is_adjoint_of_forward_half() -> Result<(), CqzeError> {
        let sequence = build_sequence(3, 2, BoundaryCondition::Pass, false)?;
        let ops = sequence.operations();
        let forward = &ops[..5];
        let returned = &ops[6..];
        for (ret, fwd) in returned.iter().zip(forward.iter().rev()) {
            assert_eq!(Some(*ret), fwd.adjoint());
        }
        assert_eq!(sequence.stages()[6], Stage::InnerReturn);
        assert_eq!(sequence.stages()[8], Stage::OuterReturn);
        Ok(())
    }

    #[test]
    fn test_measurement_is_optional() -> Result<(), CqzeError> {
        let sequence = build_sequence(1, 1, BoundaryCondition::Block, false)?;
        assert!(!sequence.has_measurement());
        assert_eq!(sequence.len(), 5);
        assert_eq!(sequence.midpoint_action(), Some(Operation::BitFlip));
        Ok(())
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let err = build_sequence(0, 5, BoundaryCondition::Pass, true);
        assert!(matches!(err, Err(CqzeError::InvalidParameter { .. })));
    }

    #[test]
    fn test_display_shows_wire() -> Result<(), CqzeError> {
        let sequence = build_sequence(1, 1, BoundaryCondition::Block, true)?;
        let text = sequence.to_string();
        assert!(text.starts_with("cqze::OperationSequence[M=1, N=1, boundary=BLOCK, 6 operations]"));
        assert!(text.contains("X"));
        assert!(text.contains("RY†"));
        Ok(())
    }
}
