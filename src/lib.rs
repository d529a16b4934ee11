//! # orbitals
//!
//! Electron density of hydrogen-like atoms: radial wavefunctions, real
//! spherical harmonics and |ψ|², plus the point clouds and planar slices a
//! renderer needs to draw them.
//!
//! ## Modules
//!
//! - `physics`: wavefunction mathematics and the Bohr radius
//! - `sampling`: rejection-sampled point clouds and density grids
//! - `formula`: orbital names and LaTeX formula templates
//! - `atomic_data`: supported one-electron species
//! - `error`: error type for the validated entry points

pub mod atomic_data;
pub mod error;
pub mod formula;
pub mod physics;
pub mod sampling;

pub use atomic_data::{atom_name, atomic_number, Species, SUPPORTED_SPECIES};
pub use error::{OrbitalError, Result};
pub use formula::{orbital_name, wavefunction_formula, WavefunctionFormula};
pub use physics::{
    associated_legendre, factorial, generalized_laguerre, max_radius, probability_density,
    radial_wavefunction, spherical_harmonic, QuantumNumbers, BOHR_RADIUS,
};
pub use sampling::{
    calculate_2d_slice, calculate_slice, generate_orbital_samples, generate_random_points,
    DensityGrid, SamplePoint, SlicePlane,
};
