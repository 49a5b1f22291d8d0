// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod params;
pub mod state;

// Re-export public types for convenient access via `cqze::core::TypeName`
pub use error::{BackendFailure, CqzeError};
pub use params::{BoundaryCondition, ProtocolParameters};
pub use state::{Outcome, Statevector};

pub mod constants;
pub use constants::cqze_constants::PI; // Re-export
