//! Defaults and numeric tolerances shared across the crate.

/// Protocol constants
pub mod cqze_constants {
    /// Used for rotation angles θ = π/(4K)
    pub const PI: f64 = std::f64::consts::PI;
    /// Default number of outer cycles (Alice's interferometer).
    pub const DEFAULT_OUTER_CYCLES: u32 = 4;
    /// Default number of inner cycles (transmission channel).
    pub const DEFAULT_INNER_CYCLES: u32 = 4;
    /// Default number of measurement repetitions per scenario.
    pub const DEFAULT_SHOTS: u64 = 1000;
    /// Allowed deviation of a distribution's total from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Default allowed deviation when classifying sampled distributions.
    pub const DEFAULT_CLASSIFY_TOLERANCE: f64 = 0.05;
}
