//! Grid command - print the tiles covering a polygon's bounding box.

use trafficgen::coord::{tile_range_for_bounding_box, tile_to_coordinate, Polygon};

use super::common;
use crate::error::CliError;

/// Arguments for the grid command.
#[derive(Debug, clap::Args)]
pub struct GridArgs {
    /// Polygon ring as "lon lat, lon lat, ..."
    #[arg(allow_hyphen_values = true)]
    pub polygon: String,

    /// Tile zoom level
    #[arg(long, default_value_t = 13, allow_negative_numbers = true)]
    pub zoom: i32,

    /// List every tile, not just the range
    #[arg(long)]
    pub list: bool,
}

/// Run the grid command.
pub fn run(args: GridArgs) -> Result<(), CliError> {
    let zoom = common::parse_zoom(args.zoom)?;
    let polygon: Polygon = args.polygon.parse()?;
    let range = tile_range_for_bounding_box(&polygon, zoom);

    println!("Tile range at zoom {}:", zoom);
    println!("  Top:    {}", range.top);
    println!("  Bottom: {}", range.bottom);
    println!("  Left:   {}", range.left);
    println!("  Right:  {}", range.right);
    println!("  Tiles:  {} ({} x {})", range.len(), range.width(), range.height());

    if args.list {
        println!();
        for tile in range.tiles() {
            let corner = tile_to_coordinate(&tile);
            println!("{}  (north-west corner {:.6}, {:.6})", tile, corner.lon, corner.lat);
        }
    }
    Ok(())
}
