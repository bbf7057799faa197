use anyhow::Result;
use electric_field::{compute_field, point_charge_potential, Config, FieldVisualiser};
use std::env;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Optional positional argument: path to a TOML config
    let config = match env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::from_file(&path)?
        }
        None => {
            info!("No configuration given, running the point-charge demo");
            Config::default()
        }
    };
    config.log_summary();

    let grid = config.grid.build()?;
    let potential = point_charge_potential(&grid, &config.point_charges(), config.coulomb_constant);

    let field = compute_field(potential.view(), grid.dx, grid.dy)?;
    info!(
        "Field computed: Ex {:?}, Ey {:?}",
        field.ex.dim(),
        field.ey.dim()
    );
    match field.max_finite_magnitude() {
        Some(max) => info!("Max |E| = {:.4e} V/m", max),
        None => warn!("Field has no finite samples"),
    }
    let non_finite = field.non_finite_count();
    if non_finite > 0 {
        warn!(
            "{} field samples are non-finite (charge on a grid node?)",
            non_finite
        );
    }

    let visualiser = FieldVisualiser::new(&config.plot);
    let (x, y) = grid.meshgrid();
    visualiser.render_field(
        x.view(),
        y.view(),
        field.ex.view(),
        field.ey.view(),
        potential.view(),
    )?;

    info!("Done");
    Ok(())
}
