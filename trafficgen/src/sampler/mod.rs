//! Random point sampling inside polygons.
//!
//! [`PolygonSampler`] draws candidates uniformly over a polygon's bounding box
//! and keeps the ones that fall strictly inside the ring (rejection sampling).
//! The expected number of draws per accepted point is the ratio of box area to
//! polygon area, so thin diagonal shapes are expensive.
//!
//! # Termination
//!
//! Without a cap the loop only ends once enough points are accepted, which for
//! a polygon covering a vanishing fraction of its box can take arbitrarily
//! long. [`PolygonSampler::with_max_attempts`] bounds the number of draws and
//! turns that case into [`SamplerError::SamplingExhausted`].
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use trafficgen::coord::Polygon;
//! use trafficgen::sampler::PolygonSampler;
//!
//! let polygon: Polygon = "0 0, 1 1, 1 0".parse().unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let points = PolygonSampler::with_max_attempts(10_000)
//!     .sample(&polygon, 10, &mut rng)
//!     .unwrap();
//! assert_eq!(points.len(), 10);
//! ```

use rand::Rng;
use thiserror::Error;

use crate::coord::{Coordinate, Polygon};

/// Upper bound on the up-front reservation for the output buffer.
const MAX_PREALLOCATED_POINTS: usize = 1 << 16;

/// Errors that can occur while sampling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    /// Polygon has a zero-area bounding box and can never accept a point.
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Zero points were requested.
    #[error("Sample count must be at least 1")]
    InvalidSampleCount,

    /// The attempt cap was reached before enough points were accepted.
    #[error("Sampling exhausted after {attempts} attempts: collected {collected} of {requested} points")]
    SamplingExhausted {
        requested: usize,
        collected: usize,
        attempts: u64,
    },
}

/// Rejection sampler for uniformly distributed points inside a polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolygonSampler {
    max_attempts: Option<u64>,
}

impl PolygonSampler {
    /// Creates a sampler with no attempt cap.
    pub fn unbounded() -> Self {
        Self { max_attempts: None }
    }

    /// Creates a sampler that gives up after `max_attempts` candidate draws.
    pub fn with_max_attempts(max_attempts: u64) -> Self {
        Self {
            max_attempts: Some(max_attempts),
        }
    }

    /// Returns the configured attempt cap, if any.
    pub fn max_attempts(&self) -> Option<u64> {
        self.max_attempts
    }

    /// Samples `count` points strictly inside `polygon`.
    ///
    /// Longitude and latitude are drawn independently from the bounding box
    /// ranges. Points are returned in the order they were accepted, so a
    /// seeded `rng` gives a reproducible sequence.
    ///
    /// # Errors
    ///
    /// * `InvalidSampleCount` if `count` is zero
    /// * `InvalidPolygon` if the bounding box has zero width or height
    /// * `SamplingExhausted` if the attempt cap is reached first
    pub fn sample<R: Rng + ?Sized>(
        &self,
        polygon: &Polygon,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Coordinate>, SamplerError> {
        if count == 0 {
            return Err(SamplerError::InvalidSampleCount);
        }

        let bounds = polygon.bounding_box();
        if bounds.is_degenerate() {
            return Err(SamplerError::InvalidPolygon(format!(
                "bounding box has zero or unbounded area ({} x {} degrees)",
                bounds.width(),
                bounds.height()
            )));
        }

        let mut points = Vec::with_capacity(count.min(MAX_PREALLOCATED_POINTS));
        let mut attempts: u64 = 0;

        while points.len() < count {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(SamplerError::SamplingExhausted {
                    requested: count,
                    collected: points.len(),
                    attempts,
                });
            }
            attempts += 1;

            let candidate = Coordinate::new(
                rng.random_range(bounds.min_lon..=bounds.max_lon),
                rng.random_range(bounds.min_lat..=bounds.max_lat),
            );

            if polygon.contains(&candidate) {
                points.push(candidate);
            }
        }

        Ok(points)
    }
}
