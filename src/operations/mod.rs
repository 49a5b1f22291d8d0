// src/operations/mod.rs

//! Defines the single-qubit operations a chained-Zeno circuit is built from.
//!
//! The photon's polarization is the only qubit. Beam-splitter stages are
//! Y-axis rotations, Bob's switch is either a no-op or a polarization flip,
//! and the detectors are a computational-basis measurement.

use num_complex::Complex;
use num_traits::Zero;

/// A 2x2 complex matrix acting on `[|H⟩, |V⟩]`.
pub type Matrix2 = [[Complex<f64>; 2]; 2];

/// One step of an operation sequence.
#[derive(Debug, Clone, Copy, PartialEq)] // Exact f64 comparison; sequences compare bit-for-bit.
pub enum Operation {
    /// Y-axis rotation `RY(theta)` of the polarization.
    ///
    /// Analogy: a polarization rotator in front of a polarizing beam splitter.
    Rotate {
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Leaves the state unchanged (Bob passes).
    Identity,

    /// Pauli-X, flipping H ↔ V (Bob blocks).
    BitFlip,

    /// Computational-basis measurement at Alice's detectors.
    Measure,
}

impl Operation {
    /// Returns the unitary matrix of the operation, or `None` for `Measure`.
    pub fn matrix(&self) -> Option<Matrix2> {
        match self {
            Operation::Rotate { theta } => Some(rotation_matrix(*theta)),
            Operation::Identity => Some(identity_matrix()),
            Operation::BitFlip => Some(flip_matrix()),
            Operation::Measure => None,
        }
    }

    /// Returns the operation that undoes this one, or `None` for `Measure`.
    pub fn adjoint(&self) -> Option<Operation> {
        match self {
            Operation::Rotate { theta } => Some(Operation::Rotate { theta: -*theta }),
            Operation::Identity => Some(Operation::Identity),
            Operation::BitFlip => Some(Operation::BitFlip),
            Operation::Measure => None,
        }
    }

    /// `true` for `Rotate`.
    pub fn is_rotation(&self) -> bool {
        matches!(self, Operation::Rotate { .. })
    }

    /// Short gate symbol used in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Rotate { theta } if *theta < 0.0 => "RY†",
            Operation::Rotate { .. } => "RY",
            Operation::Identity => "I",
            Operation::BitFlip => "X",
            Operation::Measure => "M",
        }
    }
}

/// `RY(θ) = [[cos θ/2, −sin θ/2], [sin θ/2, cos θ/2]]`
pub fn rotation_matrix(theta: f64) -> Matrix2 {
    let angle_over_2 = theta / 2.0;
    let cos_a = angle_over_2.cos();
    let sin_a = angle_over_2.sin();
    [
        [Complex::new(cos_a, 0.0), Complex::new(-sin_a, 0.0)],
        [Complex::new(sin_a, 0.0), Complex::new(cos_a, 0.0)],
    ]
}

fn identity_matrix() -> Matrix2 {
    [
        [Complex::new(1.0, 0.0), Complex::zero()],
        [Complex::zero(), Complex::new(1.0, 0.0)],
    ]
}

fn flip_matrix() -> Matrix2 {
    [
        [Complex::zero(), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::zero()],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_rotation_adjoint_negates_angle() {
        let op = Operation::Rotate { theta: PI / 8.0 };
        assert_eq!(op.adjoint(), Some(Operation::Rotate { theta: -PI / 8.0 }));
        assert_eq!(Operation::Measure.adjoint(), None);
    }

    #[test]
    fn test_rotation_by_pi_maps_h_to_v() {
        let m = rotation_matrix(PI);
        assert!(m[0][0].norm() < 1e-12);
        assert!((m[1][0].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Operation::Rotate { theta: 0.1 }.symbol(), "RY");
        assert_eq!(Operation::Rotate { theta: -0.1 }.symbol(), "RY†");
        assert_eq!(Operation::BitFlip.symbol(), "X");
        assert!(Operation::Measure.matrix().is_none());
    }
}
