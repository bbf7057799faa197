//! Electric field from a potential sampled on a uniform 2D grid.
//!
//! [`compute_field`] turns a potential `V[[i, j]]` (axis 0 along x, axis 1 along y)
//! into `E = -grad V` with first-order forward differences. The rest of the crate
//! builds demo potentials, loads run configuration and renders the
//! contour and quiver figure.

pub mod config;
pub mod contour;
pub mod error;
pub mod field;
pub mod grid;
pub mod potential;
pub mod visualisation;

pub use config::Config;
pub use error::{FieldError, FieldResult, GridAxis};
pub use field::{compute_field, ElectricField};
pub use grid::Grid;
pub use potential::{point_charge_potential, PointCharge, COULOMB_CONSTANT};
pub use visualisation::FieldVisualiser;
