use crate::config::PlotConfig;
use crate::contour::{contour_levels, contour_segments, finite_range, Point};
use anyhow::{anyhow, bail, Context, Result};
use colorgrad::Gradient;
use ndarray::{s, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Barb length relative to the shaft, and barb half-angle in radians.
const ARROW_HEAD_RATIO: f64 = 0.3;
const ARROW_HEAD_ANGLE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tail: Point,
    pub tip: Point,
    pub barbs: [Point; 2],
}

/// Quiver geometry for the aligned components.
///
/// `x`, `y` are meshgrid coordinates with the same shape as `ex`, `ey`. Arrows
/// start at `(x[[i, j]], y[[i, j]])` and are `|E| / scale * span` long in data
/// units. Samples with a non-finite component are dropped.
pub fn quiver_arrows(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    ex: ArrayView2<'_, f64>,
    ey: ArrayView2<'_, f64>,
    stride: usize,
    scale: f64,
    span: f64,
) -> Vec<Arrow> {
    let (rows, cols) = ex.dim();
    let stride = stride.max(1);
    let factor = span / scale;
    let mut arrows = Vec::new();

    for i in (0..rows).step_by(stride) {
        for j in (0..cols).step_by(stride) {
            let (u, v) = (ex[[i, j]] * factor, ey[[i, j]] * factor);
            if !(u.is_finite() && v.is_finite()) {
                continue;
            }
            let tail = (x[[i, j]], y[[i, j]]);
            let tip = (tail.0 + u, tail.1 + v);
            // Barbs point back along the shaft, rotated either side
            let (bu, bv) = (-u * ARROW_HEAD_RATIO, -v * ARROW_HEAD_RATIO);
            let (sin, cos) = ARROW_HEAD_ANGLE.sin_cos();
            let barbs = [
                (tip.0 + bu * cos - bv * sin, tip.1 + bu * sin + bv * cos),
                (tip.0 + bu * cos + bv * sin, tip.1 - bu * sin + bv * cos),
            ];
            arrows.push(Arrow { tail, tip, barbs });
        }
    }
    arrows
}

pub struct FieldVisualiser {
    output: PathBuf,
    width: u32,
    height: u32,
    levels: usize,
    quiver_scale: f64,
    quiver_stride: usize,
    gradient: Box<dyn Gradient>,
}

impl FieldVisualiser {
    pub fn new(plot: &PlotConfig) -> Self {
        Self {
            output: plot.output.clone(),
            width: plot.width,
            height: plot.height,
            levels: plot.contour_levels,
            quiver_scale: plot.quiver_scale,
            quiver_stride: plot.quiver_stride,
            gradient: Box::new(colorgrad::preset::viridis()),
        }
    }

    /// Contour of `potential` on the left, quiver of `(ex, ey)` on the right.
    ///
    /// `x` and `y` are the `(R, C)` meshgrid coordinates of the potential
    /// (see [`crate::Grid::meshgrid`]). Takes the raw forward-difference
    /// components: `ex` is `(R-1, C)` and `ey` is `(R, C-1)`. The components and
    /// the arrow positions are cropped to `(R-1, C-1)` before drawing.
    pub fn render_field(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        ex: ArrayView2<'_, f64>,
        ey: ArrayView2<'_, f64>,
        potential: ArrayView2<'_, f64>,
    ) -> Result<PathBuf> {
        let (rows, cols) = potential.dim();
        if rows < 2 || cols < 2 {
            bail!("Potential must be at least 2x2, got {}x{}", rows, cols);
        }
        if x.dim() != (rows, cols) || y.dim() != (rows, cols) {
            bail!(
                "Coordinate shapes x={:?}, y={:?} do not match potential shape ({}, {})",
                x.dim(),
                y.dim(),
                rows,
                cols
            );
        }
        if ex.dim() != (rows - 1, cols) || ey.dim() != (rows, cols - 1) {
            bail!(
                "Field shapes Ex={:?}, Ey={:?} do not match potential shape ({}, {})",
                ex.dim(),
                ey.dim(),
                rows,
                cols
            );
        }

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory '{}'", parent.display())
                })?;
            }
        }

        self.draw(x, y, ex, ey, potential)
            .map_err(|e| anyhow!("Failed to draw '{}': {}", self.output.display(), e))?;

        info!("Saved figure: {}", self.output.display());
        Ok(self.output.clone())
    }

    fn draw(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        ex: ArrayView2<'_, f64>,
        ey: ArrayView2<'_, f64>,
        potential: ArrayView2<'_, f64>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (rows, cols) = potential.dim();
        // Matrix indexing: x varies down axis 0, y along axis 1
        let axes = Axes {
            xs: x.column(0).to_vec(),
            ys: y.row(0).to_vec(),
        };

        let root = BitMapBackend::new(&self.output, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, 2));
        self.draw_potential(&panels[0], &axes, potential)?;
        self.draw_quiver(
            &panels[1],
            &axes,
            x.slice(s![..rows - 1, ..cols - 1]),
            y.slice(s![..rows - 1, ..cols - 1]),
            ex.slice(s![.., ..cols - 1]),
            ey.slice(s![..rows - 1, ..]),
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_potential<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        axes: &Axes,
        potential: ArrayView2<'_, f64>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let (panel_width, _) = area.dim_in_pixel();
        let bar_width = (panel_width / 5).max(1) as i32;
        let (plot_area, bar_area) = area.split_horizontally(panel_width as i32 - bar_width);

        let (x_min, x_max) = axes.x_range();
        let (y_min, y_max) = axes.y_range();
        let mut chart = ChartBuilder::on(&plot_area)
            .caption("Electric potential", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("x [m]")
            .y_desc("y [m]")
            .draw()?;

        let Some((v_min, v_max)) = finite_range(potential) else {
            debug!("Potential has no finite samples, skipping contours");
            return Ok(());
        };
        let levels = contour_levels(v_min, v_max, self.levels);

        for &level in &levels {
            let Some(color) = self.level_color(level, v_min, v_max) else {
                continue;
            };
            let segments = contour_segments(&axes.xs, &axes.ys, potential, level);
            debug!("Level {:.4e}: {} segments", level, segments.len());
            chart.draw_series(
                segments
                    .into_iter()
                    .map(|(a, b)| PathElement::new(vec![a, b], color.stroke_width(1))),
            )?;
        }

        self.draw_colorbar(&bar_area, &levels, v_min, v_max)
    }

    fn draw_colorbar<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        levels: &[f64],
        v_min: f64,
        v_max: f64,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        // A constant potential still needs a non-empty value axis
        let (lo, hi) = if v_max > v_min {
            (v_min, v_max)
        } else {
            let pad = 0.5 * v_min.abs().max(1.0);
            (v_min - pad, v_max + pad)
        };

        let mut chart = ChartBuilder::on(area)
            .margin_top(44)
            .margin_bottom(50)
            .margin_right(5)
            .y_label_area_size(90)
            .build_cartesian_2d(0.0..1.0, lo..hi)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Potential [V]")
            .y_label_style(("sans-serif", 14))
            .axis_desc_style(("sans-serif", 16))
            .y_label_formatter(&|v| format!("{:.2e}", v))
            .draw()?;

        // One band per gap between consecutive levels, plus the two open ends
        let mut edges = Vec::with_capacity(levels.len() + 2);
        edges.push(lo);
        edges.extend_from_slice(levels);
        edges.push(hi);
        chart.draw_series(edges.windows(2).filter_map(|w| {
            let color = self.level_color(0.5 * (w[0] + w[1]), lo, hi)?;
            Some(Rectangle::new([(0.0, w[0]), (1.0, w[1])], color.filled()))
        }))?;
        Ok(())
    }

    fn draw_quiver<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        axes: &Axes,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        ex: ArrayView2<'_, f64>,
        ey: ArrayView2<'_, f64>,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        DB::ErrorType: 'static,
    {
        let (x_min, x_max) = axes.x_range();
        let (y_min, y_max) = axes.y_range();
        let mut chart = ChartBuilder::on(area)
            .caption("Electric field", ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("x [m]")
            .y_desc("y [m]")
            .draw()?;

        let arrows = quiver_arrows(
            x,
            y,
            ex,
            ey,
            self.quiver_stride,
            self.quiver_scale,
            x_max - x_min,
        );
        debug!("Drawing {} arrows", arrows.len());

        let style = BLACK.stroke_width(1);
        chart.draw_series(arrows.iter().map(|a| PathElement::new(vec![a.tail, a.tip], style)))?;
        chart.draw_series(
            arrows
                .iter()
                .map(|a| PathElement::new(vec![a.barbs[0], a.tip, a.barbs[1]], style)),
        )?;
        Ok(())
    }

    /// Viridis colour for `value` within `[min_val, max_val]`, `None` for NaN/inf.
    fn level_color(&self, value: f64, min_val: f64, max_val: f64) -> Option<RGBColor> {
        if !value.is_finite() {
            return None;
        }
        let t = if max_val > min_val {
            ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let [r, g, b, _] = self.gradient.at(t as f32).to_rgba8();
        Some(RGBColor(r, g, b))
    }
}

/// 1D node coordinates recovered from the meshgrid arrays.
struct Axes {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Axes {
    fn x_range(&self) -> (f64, f64) {
        span_of(&self.xs)
    }

    fn y_range(&self) -> (f64, f64) {
        span_of(&self.ys)
    }
}

fn span_of(coords: &[f64]) -> (f64, f64) {
    let first = coords[0];
    let last = coords[coords.len() - 1];
    (first.min(last), first.max(last))
}
