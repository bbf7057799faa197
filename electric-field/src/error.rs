use std::fmt;
use thiserror::Error;

/// Lattice direction. Axis 0 of every grid array runs along x, axis 1 along y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    X,
    Y,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAxis::X => write!(f, "x"),
            GridAxis::Y => write!(f, "y"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("Grid needs at least 2 samples along {axis}, got {len}")]
    GridTooSmall { axis: GridAxis, len: usize },

    #[error("Grid spacing along {axis} must be nonzero and finite, got {value}")]
    InvalidSpacing { axis: GridAxis, value: f64 },
}

pub type FieldResult<T> = Result<T, FieldError>;
