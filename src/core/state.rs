// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// Computational-basis outcome of the photon's polarization.
///
/// `H` (horizontal, bit 0) is seen by detector D3; `V` (vertical, bit 1)
/// by detectors D1/D2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    /// |H⟩ = |0⟩
    H,
    /// |V⟩ = |1⟩
    V,
}

impl Outcome {
    /// Both outcomes in basis order.
    pub const ALL: [Outcome; 2] = [Outcome::H, Outcome::V];

    /// Index of the basis state (0 for `H`, 1 for `V`).
    pub fn bit(self) -> usize {
        match self {
            Outcome::H => 0,
            Outcome::V => 1,
        }
    }

    /// Bit-string label used by shot-count maps.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::H => "0",
            Outcome::V => "1",
        }
    }

    /// Parses a bit-string label (`"0"` or `"1"`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "0" => Some(Outcome::H),
            "1" => Some(Outcome::V),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::H => write!(f, "|H⟩"),
            Outcome::V => write!(f, "|V⟩"),
        }
    }
}

/// Final or intermediate state of the single photon qubit.
///
/// Amplitudes are stored in basis order `[|H⟩, |V⟩]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statevector {
    amplitudes: [Complex<f64>; 2],
}

impl Statevector {
    /// Creates a statevector from the amplitudes of |H⟩ and |V⟩.
    /// No normalization is applied; interpretation checks it.
    pub fn new(h: Complex<f64>, v: Complex<f64>) -> Self {
        Self { amplitudes: [h, v] }
    }

    /// The protocol's initial state, |H⟩ = |0⟩.
    pub fn horizontal() -> Self {
        Self::new(Complex::new(1.0, 0.0), Complex::zero())
    }

    /// Read-only access to both amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>; 2] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>; 2] {
        &mut self.amplitudes
    }

    /// Amplitude of a single basis state.
    pub fn amplitude(&self, outcome: Outcome) -> Complex<f64> {
        self.amplitudes[outcome.bit()]
    }

    /// Unnormalized Born weight |c|² of a basis state.
    pub fn weight(&self, outcome: Outcome) -> f64 {
        self.amplitude(outcome).norm_sqr()
    }

    /// Sum of |c|² over both basis states.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }
}

impl Default for Statevector {
    fn default() -> Self {
        Self::horizontal()
    }
}

impl fmt::Display for Statevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Statevector[{:.4}, {:.4}]",
            self.amplitudes[0], self.amplitudes[1]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::from_label("0"), Some(Outcome::H));
        assert_eq!(Outcome::from_label(" 1 "), Some(Outcome::V));
        assert_eq!(Outcome::from_label("10"), None);
        for outcome in Outcome::ALL {
            assert_eq!(Outcome::from_label(outcome.label()), Some(outcome));
        }
    }

    #[test]
    fn test_initial_state_is_horizontal() {
        let psi = Statevector::default();
        assert_eq!(psi.weight(Outcome::H), 1.0);
        assert_eq!(psi.weight(Outcome::V), 0.0);
        assert_eq!(psi.norm_sqr(), 1.0);
    }
}
