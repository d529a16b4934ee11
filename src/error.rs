//! Error type shared by the validated entry points.
//!
//! The raw numeric functions in [`crate::physics`] never fail; only the
//! checked constructors, the sampler and the slicer return these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitalError {
    #[error("invalid quantum numbers (n={n}, l={l}, m={m}): need n >= 1, l < n, |m| <= l")]
    InvalidQuantumNumbers { n: u32, l: u32, m: i32 },

    #[error("nuclear charge must be finite and positive, got {0}")]
    InvalidCharge(f64),

    #[error("maximum radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;
