//! Coordinate conversion module
//!
//! Projects geographic coordinates (longitude/latitude) onto the Web Mercator
//! global pixel canvas and its XYZ tile grid, and computes the rectangular
//! range of tiles covering a polygon's bounding box.
//!
//! The canvas is square and `256 × 2^zoom` pixels wide. Pixel Y grows
//! southward, so the northern edge of an area maps to the smallest tile row.

mod polygon;
mod types;

pub use polygon::{BoundingBox, Polygon};
pub use types::{
    CoordError, Coordinate, GlobalPixel, TileIndex, TileRange, TileRangeIter, ZoomLevel, MAX_LAT,
    MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM, TILE_SIZE,
};

use std::f64::consts::PI;

/// Clips a number to the specified minimum and maximum values.
#[inline]
pub fn clip(n: f64, min_value: f64, max_value: f64) -> f64 {
    n.min(max_value).max(min_value)
}

/// Width and height of the global pixel canvas at a zoom level.
#[inline]
pub fn map_size_in_pixels(zoom: ZoomLevel) -> u64 {
    (f64::from(TILE_SIZE) * 2.0_f64.powi(i32::from(zoom.value()))).ceil() as u64
}

/// Converts a coordinate into global pixel XY at a zoom level.
///
/// Latitude and longitude outside the Web Mercator range are clamped, not
/// rejected. The result is clamped to `[0, map_size - 1]` on both axes.
#[inline]
pub fn to_global_pixel(coord: Coordinate, zoom: ZoomLevel) -> GlobalPixel {
    let lat = clip(coord.lat, MIN_LAT, MAX_LAT);
    let lon = clip(coord.lon, MIN_LON, MAX_LON);

    let x = (lon + 180.0) / 360.0;
    let sin_lat = (lat * PI / 180.0).sin();
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

    let map_size = map_size_in_pixels(zoom) as f64;

    GlobalPixel {
        x: clip(x * map_size + 0.5, 0.0, map_size - 1.0),
        y: clip(y * map_size + 0.5, 0.0, map_size - 1.0),
    }
}

/// Returns the tile that contains a coordinate at a zoom level.
#[inline]
pub fn to_tile_index(coord: Coordinate, zoom: ZoomLevel) -> TileIndex {
    let pixel = to_global_pixel(coord, zoom);
    let tile_size = f64::from(TILE_SIZE);

    TileIndex {
        x: (pixel.x / tile_size).floor() as u32,
        y: (pixel.y / tile_size).floor() as u32,
        zoom,
    }
}

/// Computes the inclusive tile range covering a polygon's bounding box.
///
/// The north-west corner `(min_lon, max_lat)` supplies the top row and left
/// column, the south-east corner `(max_lon, min_lat)` the bottom row and right
/// column.
pub fn tile_range_for_bounding_box(polygon: &Polygon, zoom: ZoomLevel) -> TileRange {
    let bounds = polygon.bounding_box();
    let top_left = to_tile_index(bounds.top_left(), zoom);
    let bottom_right = to_tile_index(bounds.bottom_right(), zoom);

    TileRange {
        top: top_left.y,
        bottom: bottom_right.y,
        left: top_left.x,
        right: bottom_right.x,
        zoom,
    }
}

/// Converts a tile back to geographic coordinates.
///
/// Returns the coordinate of the tile's north-west corner.
#[inline]
pub fn tile_to_coordinate(tile: &TileIndex) -> Coordinate {
    let n = f64::from(tile.zoom.tiles_per_axis());

    let lon = f64::from(tile.x) / n * 360.0 - 180.0;

    // Inverse Web Mercator
    let y = f64::from(tile.y) / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan() * 180.0 / PI;

    Coordinate::new(lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom(z: i32) -> ZoomLevel {
        ZoomLevel::new(z).unwrap()
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip(1.0, 0.0, 2.0), 1.0);
        assert_eq!(clip(-5.0, 0.0, 2.0), 0.0);
        assert_eq!(clip(5.0, 0.0, 2.0), 2.0);
    }

    #[test]
    fn test_map_size_at_zoom_13() {
        assert_eq!(map_size_in_pixels(zoom(13)), 2_097_152);
    }

    #[test]
    fn test_map_size_at_zoom_0() {
        assert_eq!(map_size_in_pixels(zoom(0)), 256);
    }

    #[test]
    fn test_global_pixel_at_zoom_13() {
        let pixel = to_global_pixel(Coordinate::new(0.0, 1.0), zoom(13));

        assert_eq!(pixel.x, 1_048_576.5);
        assert!(
            (pixel.y - 1_042_750.782_001_071_7).abs() < 1e-6,
            "unexpected y {}",
            pixel.y
        );
    }

    #[test]
    fn test_tile_index_at_zoom_13() {
        let tile = to_tile_index(Coordinate::new(0.0, 1.0), zoom(13));

        assert_eq!((tile.x, tile.y), (4096, 4073));
        assert_eq!(tile.zoom, zoom(13));
    }

    #[test]
    fn test_tile_range_for_triangle() {
        let polygon = Polygon::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, 0.0),
        ])
        .unwrap();

        let range = tile_range_for_bounding_box(&polygon, zoom(13));

        assert_eq!(
            (range.top, range.bottom, range.left, range.right),
            (4073, 4096, 4096, 4118)
        );
    }

    #[test]
    fn test_tile_range_for_wide_strip() {
        // Wide and flat: 1 degree of longitude, 0.1 degree of latitude
        let polygon: Polygon = "0 0, 0 .1, 1 .1, 1 0".parse().unwrap();

        let range = tile_range_for_bounding_box(&polygon, zoom(13));

        assert_eq!(
            (range.top, range.bottom, range.left, range.right),
            (4093, 4096, 4096, 4118)
        );
        assert_eq!(range.len(), 92);
    }

    #[test]
    fn test_tile_range_southern_hemisphere_keeps_top_above_bottom() {
        let polygon: Polygon = "-58.5 -34.7, -58.3 -34.7, -58.3 -34.5, -58.5 -34.5"
            .parse()
            .unwrap();

        let range = tile_range_for_bounding_box(&polygon, zoom(13));

        assert!(range.top <= range.bottom);
        assert!(range.left <= range.right);

        let north = to_tile_index(Coordinate::new(-58.4, -34.5), zoom(13));
        let south = to_tile_index(Coordinate::new(-58.4, -34.7), zoom(13));
        assert_eq!(range.top, north.y);
        assert_eq!(range.bottom, south.y);
    }

    #[test]
    fn test_out_of_range_coordinates_are_clamped() {
        let z = zoom(3);
        let map_size = map_size_in_pixels(z) as f64;

        let north = to_global_pixel(Coordinate::new(0.0, 90.0), z);
        let clamped = to_global_pixel(Coordinate::new(0.0, MAX_LAT), z);
        assert_eq!(north, clamped);

        let far_east = to_global_pixel(Coordinate::new(250.0, 0.0), z);
        assert_eq!(far_east.x, map_size - 1.0);

        let far_west = to_global_pixel(Coordinate::new(-250.0, 0.0), z);
        assert_eq!(far_west.x, 0.5);
    }

    #[test]
    fn test_corner_tiles_stay_in_grid() {
        let z = zoom(4);

        let nw = to_tile_index(Coordinate::new(-180.0, 90.0), z);
        let se = to_tile_index(Coordinate::new(180.0, -90.0), z);

        assert_eq!((nw.x, nw.y), (0, 0));
        assert_eq!((se.x, se.y), (15, 15));
    }

    #[test]
    fn test_tile_to_coordinate_at_origin() {
        let tile = TileIndex {
            x: 0,
            y: 0,
            zoom: zoom(0),
        };

        let coord = tile_to_coordinate(&tile);

        assert_eq!(coord.lon, -180.0);
        assert!((coord.lat - MAX_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_tile_to_coordinate_at_equator() {
        let tile = TileIndex {
            x: 512,
            y: 512,
            zoom: zoom(10),
        };

        let coord = tile_to_coordinate(&tile);

        assert!(coord.lat.abs() < 1e-9);
        assert!(coord.lon.abs() < 1e-9);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_map_size_doubles_each_zoom(z in 0i32..30) {
                let lower = map_size_in_pixels(zoom(z));
                let upper = map_size_in_pixels(zoom(z + 1));

                prop_assert_eq!(lower, 256u64 << z);
                prop_assert_eq!(upper, lower * 2);
            }

            #[test]
            fn test_global_pixel_idempotent_under_clamping(
                lat in -120.0..120.0_f64,
                lon in -360.0..360.0_f64,
                z in 0i32..=20
            ) {
                let clamped = Coordinate::new(
                    clip(lon, MIN_LON, MAX_LON),
                    clip(lat, MIN_LAT, MAX_LAT),
                );

                let first = to_global_pixel(Coordinate::new(lon, lat), zoom(z));
                let second = to_global_pixel(clamped, zoom(z));
                let third = to_global_pixel(clamped, zoom(z));

                prop_assert_eq!(first, second);
                prop_assert_eq!(second, third);
            }

            #[test]
            fn test_global_pixel_within_canvas(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
                z in 0i32..=20
            ) {
                let pixel = to_global_pixel(Coordinate::new(lon, lat), zoom(z));
                let max = (map_size_in_pixels(zoom(z)) - 1) as f64;

                prop_assert!(pixel.x >= 0.0 && pixel.x <= max);
                prop_assert!(pixel.y >= 0.0 && pixel.y <= max);
            }

            #[test]
            fn test_tile_index_in_bounds(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64,
                z in 0i32..=20
            ) {
                let tile = to_tile_index(Coordinate::new(lon, lat), zoom(z));
                let max_tile = zoom(z).tiles_per_axis();

                prop_assert!(tile.x < max_tile, "x {} exceeds {} at zoom {}", tile.x, max_tile, z);
                prop_assert!(tile.y < max_tile, "y {} exceeds {} at zoom {}", tile.y, max_tile, z);
            }

            #[test]
            fn test_tile_corner_roundtrip(
                x_raw in 0u32..65536,
                y_raw in 0u32..65536,
                z in 1i32..=16
            ) {
                // Nudge the north-west corner inward by a fraction of a tile
                let n = zoom(z).tiles_per_axis();
                let tile = TileIndex { x: x_raw % n, y: y_raw % n, zoom: zoom(z) };

                let corner = tile_to_coordinate(&tile);
                let next = tile_to_coordinate(&TileIndex { x: tile.x + 1, y: tile.y + 1, zoom: tile.zoom });
                let inside = Coordinate::new(
                    corner.lon + (next.lon - corner.lon) * 0.25,
                    corner.lat + (next.lat - corner.lat) * 0.25,
                );

                let back = to_tile_index(inside, tile.zoom);
                prop_assert_eq!((back.x, back.y), (tile.x, tile.y));
            }

            #[test]
            fn test_adjacent_zoom_indices_scale_by_two(
                lat in -85.0..85.0_f64,
                lon in -179.9..179.9_f64,
                z in 0i32..20
            ) {
                let coarse = to_tile_index(Coordinate::new(lon, lat), zoom(z));
                let fine = to_tile_index(Coordinate::new(lon, lat), zoom(z + 1));

                // The half-pixel offset is not scaled with the canvas, so a
                // point just east/south of a coarse edge lands in the fine
                // tile right before it.
                prop_assert!(fine.x / 2 == coarse.x || fine.x + 1 == coarse.x * 2);
                prop_assert!(fine.y / 2 == coarse.y || fine.y + 1 == coarse.y * 2);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in 0.0..1.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                z in 10i32..=15
            ) {
                let tile1 = to_tile_index(Coordinate::new(lon1, lat), zoom(z));
                let tile2 = to_tile_index(Coordinate::new(lon2, lat), zoom(z));

                prop_assert!(tile1.x < tile2.x);
            }

            #[test]
            fn test_range_top_left_not_after_bottom_right(
                lon in -170.0..170.0_f64,
                lat in -80.0..80.0_f64,
                w in 0.001..5.0_f64,
                h in 0.001..5.0_f64,
                z in 0i32..=18
            ) {
                let polygon = Polygon::new(vec![
                    Coordinate::new(lon, lat),
                    Coordinate::new(lon + w, lat),
                    Coordinate::new(lon + w, lat + h),
                    Coordinate::new(lon, lat + h),
                ]).unwrap();

                let range = tile_range_for_bounding_box(&polygon, zoom(z));

                prop_assert!(range.top <= range.bottom);
                prop_assert!(range.left <= range.right);
            }
        }
    }
}
