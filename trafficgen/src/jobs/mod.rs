//! Scheduled jobs that synthesize traffic data for every city in the catalog.
//!
//! - [`RandomRouteJob`] samples random origin/destination pairs inside each
//!   city polygon and archives the route directions returned for them.
//! - [`TrafficTileJob`] archives a traffic flow tile for every tile covering
//!   each city's bounding box.
//!
//! # Failure policy
//!
//! A failed maps query or archive write is logged and the item is skipped.
//! A failure that concerns the whole city (invalid catalog record, unusable
//! polygon, sampling cap reached) is logged and aborts the run.

mod routes;
mod tiles;

pub use routes::RandomRouteJob;
pub use tiles::TrafficTileJob;

use std::fmt;

use thiserror::Error;
use tracing::error;

use crate::archive::ArchiveStore;
use crate::catalog::CatalogError;
use crate::sampler::SamplerError;

/// Result type for job runs.
pub type JobResult<T> = Result<T, JobError>;

/// Errors that abort a job run.
#[derive(Debug, Error)]
pub enum JobError {
    /// The catalog could not be loaded or a record is unusable.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Routes per city is too large to sample two points for each.
    #[error("Cannot sample {0} routes per city: point count overflows")]
    RouteCountOverflow(usize),

    /// Points could not be sampled for a city.
    #[error("Sampling failed for cityId {city_id}: {source}")]
    Sampling {
        city_id: String,
        #[source]
        source: SamplerError,
    },
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Cities fully processed.
    pub cities: usize,
    /// Objects written to the archive.
    pub archived: usize,
    /// Items skipped because of a query or archive failure.
    pub skipped: usize,
}

impl fmt::Display for JobSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cities, {} archived, {} skipped",
            self.cities, self.archived, self.skipped
        )
    }
}

/// Writes one object, logging and counting instead of failing.
fn archive_item<S: ArchiveStore>(
    store: &S,
    city_id: &str,
    path: String,
    data: Vec<u8>,
    summary: &mut JobSummary,
) {
    match store.put(&path, data) {
        Ok(()) => summary.archived += 1,
        Err(e) => {
            error!(city_id, path = %path, error = %e, "Archive write failed");
            summary.skipped += 1;
        }
    }
}
