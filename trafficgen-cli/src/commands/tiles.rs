//! Tiles command - run the traffic tile job once.

use tracing::info;
use trafficgen::jobs::TrafficTileJob;

use super::common::{self, JobOverrides};
use crate::error::CliError;

/// Arguments for the tiles command.
#[derive(Debug, clap::Args)]
pub struct TilesArgs {
    #[command(flatten)]
    pub overrides: JobOverrides,

    /// Tile zoom level (overrides TRAFFIC_TILE_ZOOM)
    #[arg(long, allow_negative_numbers = true)]
    pub zoom: Option<i32>,
}

/// Run the tiles command.
pub fn run(args: TilesArgs) -> Result<(), CliError> {
    let mut config = common::load_config(&args.overrides)?;
    if let Some(zoom) = args.zoom {
        config = config.with_tile_zoom(common::parse_zoom(zoom)?);
    }

    let output = common::resolve_output(
        args.overrides.output.as_deref(),
        config.require_tiles_output(),
    )?;
    info!(
        catalog = %config.catalog,
        output = %output,
        zoom = %config.tile_zoom,
        "Configuration loaded"
    );

    let client = common::http_client(&config)?;
    let catalog = common::catalog_source(&config.catalog, client.clone());
    let store = common::archive_store(&output, client.clone());
    let maps = common::maps_provider(&config, client)?;

    let summary = TrafficTileJob::new(maps, store, config.tile_zoom).run(catalog.as_ref())?;
    println!("Tiles job complete: {}", summary);
    Ok(())
}
