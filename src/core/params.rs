// src/core/params.rs

use super::constants::cqze_constants::{DEFAULT_INNER_CYCLES, DEFAULT_OUTER_CYCLES, PI};
use super::error::CqzeError;
use crate::operations::Operation;
use std::fmt;

/// Cycle counts of the two nested Zeno stages.
///
/// Only constructible through [`ProtocolParameters::new`], so every value in
/// circulation satisfies `m >= 1` and `n >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolParameters {
    m: u32,
    n: u32,
}

impl ProtocolParameters {
    /// Validates and creates the parameters.
    ///
    /// # Errors
    /// `CqzeError::InvalidParameter` when `m < 1` or `n < 1`. Values are never clamped.
    pub fn new(m: u32, n: u32) -> Result<Self, CqzeError> {
        if m < 1 {
            return Err(CqzeError::invalid_parameter(format!(
                "outer cycle count M must be >= 1, got {}",
                m
            )));
        }
        if n < 1 {
            return Err(CqzeError::invalid_parameter(format!(
                "inner cycle count N must be >= 1, got {}",
                n
            )));
        }
        Ok(Self { m, n })
    }

    /// Outer cycle count M.
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Inner cycle count N.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// θ_M = π/(4M), in radians.
    pub fn theta_m(&self) -> f64 {
        PI / (4.0 * f64::from(self.m))
    }

    /// θ_N = π/(4N), in radians.
    pub fn theta_n(&self) -> f64 {
        PI / (4.0 * f64::from(self.n))
    }

    /// Closed-form leakage probability π² / (16·M²·N²).
    pub fn leak_probability(&self) -> f64 {
        let m = f64::from(self.m);
        let n = f64::from(self.n);
        (PI * PI) / (16.0 * m * m * n * n)
    }
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            m: DEFAULT_OUTER_CYCLES,
            n: DEFAULT_INNER_CYCLES,
        }
    }
}

impl fmt::Display for ProtocolParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M={}, N={}", self.m, self.n)
    }
}

/// Whether Bob's switch lets the photon return unchanged or flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryCondition {
    /// Switch absent: identity at the midpoint (Bob's bit 0).
    Pass,
    /// Switch present: bit-flip at the midpoint (Bob's bit 1).
    Block,
}

impl BoundaryCondition {
    /// Both scenarios, PASS first.
    pub const ALL: [BoundaryCondition; 2] = [BoundaryCondition::Pass, BoundaryCondition::Block];

    /// Maps Bob's bit to the boundary condition (`true` blocks).
    pub fn from_bit(blocks: bool) -> Self {
        if blocks {
            BoundaryCondition::Block
        } else {
            BoundaryCondition::Pass
        }
    }

    /// Bob's bit for this boundary condition.
    pub fn bit(self) -> u8 {
        match self {
            BoundaryCondition::Pass => 0,
            BoundaryCondition::Block => 1,
        }
    }

    /// The action applied at the circuit midpoint.
    pub fn midpoint(self) -> Operation {
        match self {
            BoundaryCondition::Pass => Operation::Identity,
            BoundaryCondition::Block => Operation::BitFlip,
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Pass => write!(f, "PASS"),
            BoundaryCondition::Block => write!(f, "BLOCK"),
        }
    }
}
