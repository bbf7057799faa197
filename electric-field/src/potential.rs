use crate::grid::Grid;
use ndarray::Array2;

/// Coulomb constant k = 1 / (4 pi eps0) in N m^2 / C^2, rounded.
pub const COULOMB_CONSTANT: f64 = 9.0e9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCharge {
    pub x: f64, // Position x (m)
    pub y: f64, // Position y (m)
    pub q: f64, // Charge (C)
}

impl PointCharge {
    pub fn new(x: f64, y: f64, q: f64) -> Self {
        Self { x, y, q }
    }

    /// `k q / r` at `(px, py)`. Infinite (or NaN for q = 0) on the charge itself.
    pub fn potential_at(&self, px: f64, py: f64, k: f64) -> f64 {
        let r = (px - self.x).hypot(py - self.y);
        k * self.q / r
    }
}

/// Superposed point-charge potential sampled on every node of `grid`.
pub fn point_charge_potential(grid: &Grid, charges: &[PointCharge], k: f64) -> Array2<f64> {
    let mut potential = Array2::<f64>::zeros(grid.dim());

    for ((i, j), v) in potential.indexed_iter_mut() {
        let x = grid.x_coord(i);
        let y = grid.y_coord(j);
        *v = charges.iter().map(|c| c.potential_at(x, y, k)).sum();
    }

    potential
}
