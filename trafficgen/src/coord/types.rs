//! Coordinate type definitions

use std::fmt;

use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Edge length of a square map tile in pixels, identical at every zoom level.
pub const TILE_SIZE: u32 = 256;

/// Supported zoom range.
///
/// The upper bound keeps tile indices within `u32` and global pixel maths
/// exact in `f64`.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 30;

/// A geographic position in degrees (WGS-84, no datum conversion).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Longitude in degrees, positive east
    pub lon: f64,
    /// Latitude in degrees, positive north
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from a longitude/latitude pair.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns true when both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lon, self.lat)
    }
}

/// Validated web-mercator zoom level.
///
/// Constructed once at the boundary so every projection function can take a
/// zoom that is already known to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    /// Validates a raw zoom value.
    ///
    /// # Errors
    ///
    /// Returns `CoordError::InvalidZoomLevel` for negative values or values
    /// above [`MAX_ZOOM`].
    pub fn new(zoom: i32) -> Result<Self, CoordError> {
        if zoom < i32::from(MIN_ZOOM) || zoom > i32::from(MAX_ZOOM) {
            return Err(CoordError::InvalidZoomLevel(zoom));
        }
        Ok(Self(zoom as u8))
    }

    /// Builds a zoom level from a non-negative value, capping it at
    /// [`MAX_ZOOM`].
    #[inline]
    pub const fn saturating(zoom: u8) -> Self {
        if zoom > MAX_ZOOM {
            Self(MAX_ZOOM)
        } else {
            Self(zoom)
        }
    }

    /// Returns the raw zoom value.
    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Number of tiles along one axis of the global grid (`2^zoom`).
    #[inline]
    pub fn tiles_per_axis(self) -> u32 {
        1u32 << self.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position on the global pixel canvas at some zoom level.
///
/// Y grows downward (north to south), X grows eastward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalPixel {
    pub x: f64,
    pub y: f64,
}

/// XYZ tile index within the global grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Column, 0 at the antimeridian west edge
    pub x: u32,
    /// Row, 0 at the north edge
    pub y: u32,
    pub zoom: ZoomLevel,
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{} Y:{} Zoom:{}", self.x, self.y, self.zoom)
    }
}

/// Inclusive rectangle of tiles covering a bounding box.
///
/// `top` is the row of the northern (maximum latitude) edge and `bottom` the
/// row of the southern edge, so `top <= bottom` even though latitude grows in
/// the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    pub zoom: ZoomLevel,
}

// A range always covers at least one tile, so there is no `is_empty`.
#[allow(clippy::len_without_is_empty)]
impl TileRange {
    /// Number of columns in the range.
    #[inline]
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Number of rows in the range.
    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Total number of tiles in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns true if the tile lies inside this range at the same zoom.
    pub fn contains(&self, tile: &TileIndex) -> bool {
        tile.zoom == self.zoom
            && (self.left..=self.right).contains(&tile.x)
            && (self.top..=self.bottom).contains(&tile.y)
    }

    /// Iterates all tiles column by column (x outer, y inner).
    #[inline]
    pub fn tiles(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            current: 0,
        }
    }
}

impl fmt::Display for TileRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={} bottom={} left={} right={} zoom={}",
            self.top, self.bottom, self.left, self.right, self.zoom
        )
    }
}

/// Iterator over the tiles of a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    current: usize,
}

impl Iterator for TileRangeIter {
    type Item = TileIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.range.len() {
            return None;
        }

        let height = self.range.height() as usize;
        let column = (self.current / height) as u32;
        let row = (self.current % height) as u32;

        self.current += 1;

        Some(TileIndex {
            x: self.range.left + column,
            y: self.range.top + row,
            zoom: self.range.zoom,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.len() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRangeIter {}

/// Errors raised by the geometry core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Zoom level is negative or above the supported maximum
    #[error(
        "Invalid zoom level: {0} (must be between {} and {})",
        MIN_ZOOM,
        MAX_ZOOM
    )]
    InvalidZoomLevel(i32),

    /// Polygon cannot be used as a sampling or tiling area
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),
}
