use crate::grid::Grid;
use crate::potential::{PointCharge, COULOMB_CONSTANT};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Grid configuration: closed bounds and point counts per axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub nx: usize,
    pub ny: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            nx: 100,
            ny: 100,
            x_min: -5.0,
            x_max: 5.0,
            y_min: -5.0,
            y_max: 5.0,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(anyhow!(
                "Grid needs at least 2 points per axis (nx={}, ny={})",
                self.nx,
                self.ny
            ));
        }
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(anyhow!("Grid bounds must be finite, got {:?}", bounds));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(anyhow!(
                "Grid bounds must be increasing (x: {}..{}, y: {}..{})",
                self.x_min,
                self.x_max,
                self.y_min,
                self.y_max
            ));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Grid> {
        Grid::linspace(self.x_min, self.x_max, self.nx, self.y_min, self.y_max, self.ny)
            .context("Failed to build grid")
    }
}

/// Point charge configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeConfig {
    pub x: f64, // m
    pub y: f64, // m
    pub q: f64, // C
}

impl ChargeConfig {
    fn validate(&self) -> Result<()> {
        if !(self.x.is_finite() && self.y.is_finite() && self.q.is_finite()) {
            return Err(anyhow!(
                "Charge values must be finite (x={}, y={}, q={})",
                self.x,
                self.y,
                self.q
            ));
        }
        Ok(())
    }
}

impl From<&ChargeConfig> for PointCharge {
    fn from(c: &ChargeConfig) -> Self {
        PointCharge::new(c.x, c.y, c.q)
    }
}

/// Figure configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_contour_levels")]
    pub contour_levels: usize,
    #[serde(default = "default_quiver_scale")]
    pub quiver_scale: f64,
    #[serde(default = "default_quiver_stride")]
    pub quiver_stride: usize,
}

fn default_output() -> PathBuf {
    PathBuf::from("output/electric_field.png")
}

fn default_width() -> u32 {
    1200
}

fn default_height() -> u32 {
    500
}

fn default_contour_levels() -> usize {
    20
}

fn default_quiver_scale() -> f64 {
    50.0
}

fn default_quiver_stride() -> usize {
    1
}

fn default_coulomb_constant() -> f64 {
    COULOMB_CONSTANT
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            width: default_width(),
            height: default_height(),
            contour_levels: default_contour_levels(),
            quiver_scale: default_quiver_scale(),
            quiver_stride: default_quiver_stride(),
        }
    }
}

impl PlotConfig {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.width,
                self.height
            ));
        }
        if self.contour_levels == 0 {
            return Err(anyhow!("contour_levels must be at least 1"));
        }
        if !(self.quiver_scale.is_finite() && self.quiver_scale > 0.0) {
            return Err(anyhow!(
                "quiver_scale must be positive, got {}",
                self.quiver_scale
            ));
        }
        if self.quiver_stride == 0 {
            return Err(anyhow!("quiver_stride must be at least 1"));
        }
        Ok(())
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_coulomb_constant")]
    pub coulomb_constant: f64,
    pub grid: GridConfig,
    pub charges: Vec<ChargeConfig>,
    #[serde(default)]
    pub plot: PlotConfig,
}

impl Default for Config {
    /// Unit charge of 1 nC at the origin on a 100 x 100 grid over [-5, 5]^2.
    fn default() -> Self {
        Self {
            coulomb_constant: COULOMB_CONSTANT,
            grid: GridConfig::default(),
            charges: vec![ChargeConfig {
                x: 0.0,
                y: 0.0,
                q: 1e-9,
            }],
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.plot.validate()?;

        if !self.coulomb_constant.is_finite() {
            return Err(anyhow!(
                "coulomb_constant must be finite, got {}",
                self.coulomb_constant
            ));
        }
        if self.charges.is_empty() {
            return Err(anyhow!("At least one charge must be defined"));
        }
        for (idx, charge) in self.charges.iter().enumerate() {
            charge
                .validate()
                .with_context(|| format!("Invalid charge {}", idx))?;
        }
        Ok(())
    }

    pub fn point_charges(&self) -> Vec<PointCharge> {
        self.charges.iter().map(PointCharge::from).collect()
    }

    pub fn log_summary(&self) {
        info!(
            "Grid: {}x{} over x=[{}, {}] m, y=[{}, {}] m",
            self.grid.nx, self.grid.ny, self.grid.x_min, self.grid.x_max, self.grid.y_min, self.grid.y_max
        );
        info!(
            "Charges: {} (k={:e})",
            self.charges.len(),
            self.coulomb_constant
        );
        for (i, c) in self.charges.iter().enumerate() {
            info!("  Charge {}: q={:e} C at ({}, {})", i, c.q, c.x, c.y);
        }
        info!(
            "Plot: {}x{} px, {} contour levels, quiver scale={} stride={} -> {}",
            self.plot.width,
            self.plot.height,
            self.plot.contour_levels,
            self.plot.quiver_scale,
            self.plot.quiver_stride,
            self.plot.output.display()
        );
    }
}
