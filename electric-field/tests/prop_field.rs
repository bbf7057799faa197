//! Property-based tests for the forward-difference field computation.

use approx::assert_relative_eq;
use electric_field::{compute_field, point_charge_potential, Config, FieldError, Grid, PointCharge};
use ndarray::Array2;
use proptest::prelude::*;

fn potential_strategy() -> impl Strategy<Value = Array2<f64>> {
    (2usize..12, 2usize..12).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(-1.0e3..1.0e3f64, rows * cols)
            .prop_map(move |values| Array2::from_shape_vec((rows, cols), values).unwrap())
    })
}

fn spacing() -> impl Strategy<Value = f64> {
    prop_oneof![1.0e-3..10.0f64, -10.0..-1.0e-3f64]
}

proptest! {
    /// Ex drops one sample along x, Ey one along y.
    #[test]
    fn component_shapes(potential in potential_strategy(), dx in spacing(), dy in spacing()) {
        let (rows, cols) = potential.dim();
        let field = compute_field(potential.view(), dx, dy).unwrap();
        prop_assert_eq!(field.ex.dim(), (rows - 1, cols));
        prop_assert_eq!(field.ey.dim(), (rows, cols - 1));
    }

    #[test]
    fn constant_potential_has_no_field(
        rows in 2usize..15,
        cols in 2usize..15,
        v in -1.0e6..1.0e6f64,
        dx in spacing(),
        dy in spacing(),
    ) {
        let potential = Array2::from_elem((rows, cols), v);
        let field = compute_field(potential.view(), dx, dy).unwrap();
        prop_assert!(field.ex.iter().all(|&e| e == 0.0));
        prop_assert!(field.ey.iter().all(|&e| e == 0.0));
    }

    /// A linear potential a*x + b*y is differenced exactly, up to rounding.
    #[test]
    fn linear_potential_gives_uniform_field(
        rows in 2usize..15,
        cols in 2usize..15,
        a in -100.0..100.0f64,
        b in -100.0..100.0f64,
        dx in 0.01..2.0f64,
        dy in 0.01..2.0f64,
    ) {
        let grid = Grid::new(rows, cols, dx, dy);
        let potential = Array2::from_shape_fn(grid.dim(), |(i, j)| {
            a * grid.x_coord(i) + b * grid.y_coord(j)
        });
        let field = compute_field(potential.view(), dx, dy).unwrap();
        for &e in field.ex.iter() {
            prop_assert!((e + a).abs() <= 1e-8 * (1.0 + a.abs() + b.abs()) / dx.min(dy),
                "Ex = {}, expected {}", e, -a);
        }
        for &e in field.ey.iter() {
            prop_assert!((e + b).abs() <= 1e-8 * (1.0 + a.abs() + b.abs()) / dx.min(dy),
                "Ey = {}, expected {}", e, -b);
        }
    }

    #[test]
    fn field_scales_with_potential(
        potential in potential_strategy(),
        s in prop_oneof![0.1..10.0f64, -10.0..-0.1f64],
        dx in spacing(),
        dy in spacing(),
    ) {
        let base = compute_field(potential.view(), dx, dy).unwrap();
        let scaled_potential = potential.mapv(|v| s * v);
        let scaled = compute_field(scaled_potential.view(), dx, dy).unwrap();
        // Rounding of s * V is bounded by the largest potential sample (1e3)
        let tol = |d: f64, expected: f64| {
            1e-12 * (1.0 + s.abs() * 2.0e3) / d.abs() + 1e-12 * expected.abs()
        };
        for (&e, &e0) in scaled.ex.iter().zip(base.ex.iter()) {
            prop_assert!((e - s * e0).abs() <= tol(dx, s * e0), "{} vs {}", e, s * e0);
        }
        for (&e, &e0) in scaled.ey.iter().zip(base.ey.iter()) {
            prop_assert!((e - s * e0).abs() <= tol(dy, s * e0), "{} vs {}", e, s * e0);
        }
    }

    /// Flipping one spacing flips only its own component.
    #[test]
    fn spacing_sign_flips_matching_component(
        potential in potential_strategy(),
        dx in spacing(),
        dy in spacing(),
    ) {
        let base = compute_field(potential.view(), dx, dy).unwrap();
        let flip_x = compute_field(potential.view(), -dx, dy).unwrap();
        let flip_y = compute_field(potential.view(), dx, -dy).unwrap();
        prop_assert_eq!(&flip_x.ex, &base.ex.mapv(|e| -e));
        prop_assert_eq!(&flip_x.ey, &base.ey);
        prop_assert_eq!(&flip_y.ex, &base.ex);
        prop_assert_eq!(&flip_y.ey, &base.ey.mapv(|e| -e));
    }

    #[test]
    fn single_row_or_column_is_rejected(n in 0usize..20, thin in 0usize..2) {
        let row = Array2::<f64>::zeros((thin, n.max(2)));
        let is_too_small = matches!(
            compute_field(row.view(), 1.0, 1.0),
            Err(FieldError::GridTooSmall { .. })
        );
        prop_assert!(is_too_small);
        let column = Array2::<f64>::zeros((n.max(2), thin));
        let is_too_small = matches!(
            compute_field(column.view(), 1.0, 1.0),
            Err(FieldError::GridTooSmall { .. })
        );
        prop_assert!(is_too_small);
    }
}

/// The demo setup: field points away from a positive charge and decays with distance.
#[test]
fn point_charge_field_points_outward() {
    let config = Config::default();
    let grid = config.grid.build().unwrap();
    let potential =
        point_charge_potential(&grid, &config.point_charges(), config.coulomb_constant);
    let field = compute_field(potential.view(), grid.dx, grid.dy).unwrap();

    assert_eq!(field.ex.dim(), (99, 100));
    assert_eq!(field.ey.dim(), (100, 99));
    // 100 points never land on the origin
    assert_eq!(field.non_finite_count(), 0);

    // Right of the charge, on the row nearest y = 0
    let j = 49;
    assert!(field.ex[[80, j]] > 0.0);
    assert!(field.ex[[10, j]] < 0.0);
    assert!(field.ey[[j, 80]] > 0.0);
    assert!(field.ey[[j, 10]] < 0.0);
    assert!(field.ex[[80, j]].abs() > field.ex[[95, j]].abs());
}

#[test]
fn forward_difference_matches_coulomb_far_from_charge() {
    let grid = Grid::linspace(1.0, 3.0, 2001, -0.5, 0.5, 3).unwrap();
    let charge = PointCharge::new(0.0, 0.0, 1e-9);
    let potential = point_charge_potential(&grid, &[charge], 9.0e9);
    let field = compute_field(potential.view(), grid.dx, grid.dy).unwrap();

    // E = kq / r^2 at r = 2 on the x axis (j = 1 is y = 0)
    let i = 1000;
    let r_mid = grid.x_coord(i) + 0.5 * grid.dx;
    assert_relative_eq!(field.ex[[i, 1]], 9.0 / (r_mid * r_mid), max_relative = 1e-5);
}
