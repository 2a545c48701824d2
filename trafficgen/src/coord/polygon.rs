//! Simple polygons and their bounding boxes.
//!
//! City areas arrive as WKT-style rings: a comma-separated list of
//! `"lon lat"` pairs. The ring is implicitly closed, so the first vertex does
//! not need to be repeated at the end.

use std::str::FromStr;

use super::types::{CoordError, Coordinate};

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Longitudinal extent in degrees.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitudinal extent in degrees.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// True when the box has zero width or height, or an extent too large
    /// to represent as a finite `f64`.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let (width, height) = (self.width(), self.height());
        !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite())
    }

    /// North-west corner (minimum longitude, maximum latitude).
    #[inline]
    pub fn top_left(&self) -> Coordinate {
        Coordinate::new(self.min_lon, self.max_lat)
    }

    /// South-east corner (maximum longitude, minimum latitude).
    #[inline]
    pub fn bottom_right(&self) -> Coordinate {
        Coordinate::new(self.max_lon, self.min_lat)
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&point.lon)
            && (self.min_lat..=self.max_lat).contains(&point.lat)
    }
}

/// Immutable simple polygon (single outer ring, no holes).
///
/// Self-intersection is not checked; containment results for
/// self-intersecting rings follow the even-odd rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Coordinate>,
    bounds: BoundingBox,
}

impl Polygon {
    /// Builds a polygon from its ring vertices.
    ///
    /// A trailing vertex equal to the first one is treated as the explicit
    /// closing vertex and dropped.
    ///
    /// # Errors
    ///
    /// Returns `CoordError::InvalidPolygon` if any vertex is not finite or if
    /// fewer than three vertices remain.
    pub fn new(mut vertices: Vec<Coordinate>) -> Result<Self, CoordError> {
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(CoordError::InvalidPolygon(format!(
                "vertex ({}) is not finite",
                bad
            )));
        }

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(CoordError::InvalidPolygon(format!(
                "need at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let bounds = vertices.iter().fold(
            BoundingBox {
                min_lon: f64::INFINITY,
                min_lat: f64::INFINITY,
                max_lon: f64::NEG_INFINITY,
                max_lat: f64::NEG_INFINITY,
            },
            |b, v| BoundingBox {
                min_lon: b.min_lon.min(v.lon),
                min_lat: b.min_lat.min(v.lat),
                max_lon: b.max_lon.max(v.lon),
                max_lat: b.max_lat.max(v.lat),
            },
        );

        Ok(Self { vertices, bounds })
    }

    /// Ring vertices without the closing vertex.
    #[inline]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Iterates the ring edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Length of the closed ring in degrees.
    pub fn perimeter(&self) -> f64 {
        self.edges()
            .map(|(a, b)| (b.lon - a.lon).hypot(b.lat - a.lat))
            .sum()
    }

    /// Strict interior test.
    ///
    /// Uses even-odd ray casting (a horizontal ray towards +lon). Points
    /// lying exactly on an edge or vertex are reported as outside.
    pub fn contains(&self, point: &Coordinate) -> bool {
        if !self.bounds.contains(point) || self.on_boundary(point) {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            // Edge must straddle the ray; half-open on the upper endpoint
            if (a.lat > point.lat) == (b.lat > point.lat) {
                continue;
            }

            let x_intersect = a.lon + (b.lon - a.lon) * (point.lat - a.lat) / (b.lat - a.lat);
            if point.lon < x_intersect {
                inside = !inside;
            }
        }

        inside
    }

    /// True if the point lies on any edge of the ring.
    pub fn on_boundary(&self, point: &Coordinate) -> bool {
        self.edges().any(|(a, b)| {
            let cross = (b.lon - a.lon) * (point.lat - a.lat) - (b.lat - a.lat) * (point.lon - a.lon);
            cross == 0.0
                && point.lon >= a.lon.min(b.lon)
                && point.lon <= a.lon.max(b.lon)
                && point.lat >= a.lat.min(b.lat)
                && point.lat <= a.lat.max(b.lat)
        })
    }
}

impl FromStr for Polygon {
    type Err = CoordError;

    /// Parses a ring such as `"0 0, 0 1, 1 1, 1 0"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vertices = s
            .split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(parse_vertex)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(vertices)
    }
}

fn parse_vertex(pair: &str) -> Result<Coordinate, CoordError> {
    let mut parts = pair.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CoordError::InvalidPolygon(format!(
            "expected 'lon lat' pair, got '{}'",
            pair
        )));
    };

    let parse = |value: &str| {
        value.parse::<f64>().map_err(|e| {
            CoordError::InvalidPolygon(format!("invalid number '{}' in '{}': {}", value, pair, e))
        })
    };

    Ok(Coordinate::new(parse(lon)?, parse(lat)?))
}
