use crate::error::{FieldError, FieldResult, GridAxis};
use ndarray::{s, Array2, ArrayView2, Zip};

/// Field components from a forward-difference stencil.
///
/// `ex` has shape `(rows - 1, cols)` and `ey` has shape `(rows, cols - 1)`
/// for a `(rows, cols)` potential. Use [`ElectricField::aligned`] to get both on
/// the common `(rows - 1, cols - 1)` lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricField {
    pub ex: Array2<f64>,
    pub ey: Array2<f64>,
}

impl ElectricField {
    pub fn into_components(self) -> (Array2<f64>, Array2<f64>) {
        (self.ex, self.ey)
    }

    /// Both components cropped to `(rows - 1, cols - 1)`.
    pub fn aligned(&self) -> (ArrayView2<'_, f64>, ArrayView2<'_, f64>) {
        let (rows_x, cols_x) = self.ex.dim();
        let (rows_y, cols_y) = self.ey.dim();
        let rows = rows_x.min(rows_y);
        let cols = cols_x.min(cols_y);
        (
            self.ex.slice(s![..rows, ..cols]),
            self.ey.slice(s![..rows, ..cols]),
        )
    }

    /// |E| on the aligned lattice.
    pub fn magnitude(&self) -> Array2<f64> {
        let (ex, ey) = self.aligned();
        Zip::from(&ex)
            .and(&ey)
            .map_collect(|&ex, &ey| ex.hypot(ey))
    }

    /// Largest finite |E|, or `None` when every sample is NaN/inf.
    pub fn max_finite_magnitude(&self) -> Option<f64> {
        self.magnitude()
            .iter()
            .copied()
            .filter(|m| m.is_finite())
            .reduce(f64::max)
    }

    pub fn non_finite_count(&self) -> usize {
        self.ex
            .iter()
            .chain(self.ey.iter())
            .filter(|v| !v.is_finite())
            .count()
    }
}

/// E = -grad V by first-order forward differences.
///
/// Axis 0 of `potential` is x (spacing `dx`), axis 1 is y (spacing `dy`).
/// Non-finite potential samples propagate into the output unchanged.
pub fn compute_field(potential: ArrayView2<'_, f64>, dx: f64, dy: f64) -> FieldResult<ElectricField> {
    let (rows, cols) = potential.dim();
    if rows < 2 {
        return Err(FieldError::GridTooSmall {
            axis: GridAxis::X,
            len: rows,
        });
    }
    if cols < 2 {
        return Err(FieldError::GridTooSmall {
            axis: GridAxis::Y,
            len: cols,
        });
    }
    check_spacing(GridAxis::X, dx)?;
    check_spacing(GridAxis::Y, dy)?;

    let dv_x = &potential.slice(s![1.., ..]) - &potential.slice(s![..-1, ..]);
    let dv_y = &potential.slice(s![.., 1..]) - &potential.slice(s![.., ..-1]);

    Ok(ElectricField {
        ex: dv_x.mapv_into(|d| -d / dx),
        ey: dv_y.mapv_into(|d| -d / dy),
    })
}

fn check_spacing(axis: GridAxis, value: f64) -> FieldResult<()> {
    if value == 0.0 || !value.is_finite() {
        return Err(FieldError::InvalidSpacing { axis, value });
    }
    Ok(())
}
