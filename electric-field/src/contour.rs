//! Iso-line extraction by marching squares.
//!
//! `data[[i, j]]` is the sample at `(x[i], y[j])`. Each cell is walked
//! counter-clockwise from its lower-left corner, and an edge carries a crossing
//! when its two corners fall on different sides of the level.

use ndarray::ArrayView2;

pub type Point = (f64, f64);
pub type Segment = (Point, Point);

/// `n` levels evenly spaced strictly inside `(min, max)`.
pub fn contour_levels(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 0 || min.is_nan() || max.is_nan() || max <= min {
        return Vec::new();
    }
    let step = (max - min) / (n + 1) as f64;
    (1..=n).map(|k| min + step * k as f64).collect()
}

/// Finite `(min, max)` of the samples, or `None` when nothing is finite.
pub fn finite_range(data: ArrayView2<'_, f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

pub fn contour_segments(
    x: &[f64],
    y: &[f64],
    data: ArrayView2<'_, f64>,
    level: f64,
) -> Vec<Segment> {
    let (nx, ny) = data.dim();
    let mut segments = Vec::new();
    if nx < 2 || ny < 2 || x.len() < nx || y.len() < ny {
        return segments;
    }

    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            // Corners: lower-left, lower-right, upper-right, upper-left
            let corners = [
                (x[i], y[j], data[[i, j]]),
                (x[i + 1], y[j], data[[i + 1, j]]),
                (x[i + 1], y[j + 1], data[[i + 1, j + 1]]),
                (x[i], y[j + 1], data[[i, j + 1]]),
            ];
            if corners.iter().any(|c| !c.2.is_finite()) {
                continue;
            }

            // crossings[e] sits on the edge from corner e to corner e + 1
            let mut crossings: [Option<Point>; 4] = [None; 4];
            for (e, crossing) in crossings.iter_mut().enumerate() {
                let a = corners[e];
                let b = corners[(e + 1) % 4];
                if (a.2 >= level) != (b.2 >= level) {
                    let t = (level - a.2) / (b.2 - a.2);
                    *crossing = Some((a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)));
                }
            }

            match crossings {
                [Some(p0), Some(p1), Some(p2), Some(p3)] => {
                    // Saddle: the centre decides which diagonal stays connected
                    let centre = corners.iter().map(|c| c.2).sum::<f64>() / 4.0;
                    if (centre >= level) == (corners[0].2 >= level) {
                        segments.push((p0, p1));
                        segments.push((p2, p3));
                    } else {
                        segments.push((p3, p0));
                        segments.push((p1, p2));
                    }
                }
                _ => {
                    let mut found = crossings.iter().flatten();
                    if let (Some(&a), Some(&b)) = (found.next(), found.next()) {
                        segments.push((a, b));
                    }
                }
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    #[test]
    fn levels_exclude_the_extremes() {
        let levels = contour_levels(0.0, 10.0, 4);
        assert_eq!(levels, vec![2.0, 4.0, 6.0, 8.0]);
        assert!(contour_levels(1.0, 1.0, 5).is_empty());
        assert!(contour_levels(0.0, 1.0, 0).is_empty());
        assert!(contour_levels(0.0, f64::NAN, 3).is_empty());
    }

    #[test]
    fn finite_range_skips_singularities() {
        let data = array![[1.0, f64::INFINITY], [-2.0, f64::NAN]];
        assert_eq!(finite_range(data.view()), Some((-2.0, 1.0)));
        let data = array![[f64::NAN]];
        assert_eq!(finite_range(data.view()), None);
    }

    #[test]
    fn ramp_in_x_gives_vertical_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0];
        let data = Array2::from_shape_fn((4, 3), |(i, _)| x[i]);
        let segments = contour_segments(&x, &y, data.view(), 1.5);
        assert_eq!(segments.len(), 2);
        for (a, b) in segments {
            assert_relative_eq!(a.0, 1.5);
            assert_relative_eq!(b.0, 1.5);
            assert_relative_eq!((a.1 - b.1).abs(), 1.0);
        }
    }

    #[test]
    fn level_outside_range_gives_nothing() {
        let x = [0.0, 1.0];
        let y = [0.0, 1.0];
        let data = array![[0.0, 1.0], [1.0, 2.0]];
        assert!(contour_segments(&x, &y, data.view(), 5.0).is_empty());
    }

    #[test]
    fn saddle_cell_gives_two_segments() {
        let x = [0.0, 1.0];
        let y = [0.0, 1.0];
        // High on one diagonal, low on the other
        let data = array![[1.0, 0.0], [0.0, 1.0]];
        let segments = contour_segments(&x, &y, data.view(), 0.5);
        assert_eq!(segments.len(), 2);
        for (a, b) in &segments {
            let length = (a.0 - b.0).hypot(a.1 - b.1);
            assert_relative_eq!(length, 0.5_f64.sqrt(), epsilon = 1e-12);
        }
    }

    #[test]
    fn non_finite_cells_are_skipped() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0];
        let data = array![[0.0, 0.0], [1.0, f64::INFINITY], [2.0, 2.0]];
        assert!(contour_segments(&x, &y, data.view(), 0.5).is_empty());
    }
}
