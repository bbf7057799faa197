use crate::error::{FieldError, FieldResult, GridAxis};
use ndarray::Array2;

/// Uniform rectangular lattice. Index `i` runs along x, `j` along y.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub nx: usize, // Number of points in x direction
    pub ny: usize, // Number of points in y direction
    pub dx: f64,   // Grid spacing in x (meters)
    pub dy: f64,   // Grid spacing in y (meters)
    pub x0: f64,   // x coordinate of node i = 0
    pub y0: f64,   // y coordinate of node j = 0
}

impl Grid {
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> Self {
        Grid {
            nx,
            ny,
            dx,
            dy,
            x0: 0.0,
            y0: 0.0,
        }
    }

    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    /// Closed-interval lattice, both endpoints included.
    pub fn linspace(
        x_min: f64,
        x_max: f64,
        nx: usize,
        y_min: f64,
        y_max: f64,
        ny: usize,
    ) -> FieldResult<Self> {
        if nx < 2 {
            return Err(FieldError::GridTooSmall {
                axis: GridAxis::X,
                len: nx,
            });
        }
        if ny < 2 {
            return Err(FieldError::GridTooSmall {
                axis: GridAxis::Y,
                len: ny,
            });
        }
        let dx = (x_max - x_min) / (nx - 1) as f64;
        let dy = (y_max - y_min) / (ny - 1) as f64;
        Ok(Grid::new(nx, ny, dx, dy).with_origin(x_min, y_min))
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn x_coord(&self, i: usize) -> f64 {
        self.x0 + self.dx * (i as f64)
    }

    pub fn y_coord(&self, j: usize) -> f64 {
        self.y0 + self.dy * (j as f64)
    }

    /// Coordinate arrays shaped `(nx, ny)` with `x[[i, j]] = x_i`, `y[[i, j]] = y_j`.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let x = Array2::from_shape_fn(self.dim(), |(i, _)| self.x_coord(i));
        let y = Array2::from_shape_fn(self.dim(), |(_, j)| self.y_coord(j));
        (x, y)
    }
}
