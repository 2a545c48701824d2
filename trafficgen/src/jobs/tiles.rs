//! Traffic tile job.
//!
//! Covers each city's bounding box with web-mercator tiles at a fixed zoom
//! level and archives the traffic flow image of every tile, byte for byte.

use tracing::{debug, error, info};

use super::{archive_item, JobResult, JobSummary};
use crate::archive::{ArchivePath, ArchiveStore, Clock, SystemClock};
use crate::catalog::CatalogSource;
use crate::coord::{tile_range_for_bounding_box, Polygon, ZoomLevel};
use crate::provider::{HttpClient, MapsProvider};

/// Job that archives traffic flow tiles for every city.
pub struct TrafficTileJob<C: HttpClient, S: ArchiveStore> {
    maps: MapsProvider<C>,
    store: S,
    clock: Box<dyn Clock>,
    zoom: ZoomLevel,
}

impl<C: HttpClient, S: ArchiveStore> TrafficTileJob<C, S> {
    pub fn new(maps: MapsProvider<C>, store: S, zoom: ZoomLevel) -> Self {
        Self {
            maps,
            store,
            clock: Box::new(SystemClock),
            zoom,
        }
    }

    /// Replaces the clock used for archive timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Runs the job once over the whole catalog.
    pub fn run(&self, catalog: &dyn CatalogSource) -> JobResult<JobSummary> {
        info!(zoom = %self.zoom, "Traffic tile job started");

        let records = catalog.load().inspect_err(|e| {
            error!(error = %e, "Failed to load city catalog");
        })?;
        info!(cities = records.len(), "Retrieved city catalog");

        let mut summary = JobSummary::default();
        for (index, record) in records.iter().enumerate() {
            let polygon = record.to_polygon(index).inspect_err(|e| {
                error!(index, error = %e, "Invalid catalog record");
            })?;

            self.run_city(&record.city_id, &polygon, &mut summary);

            summary.cities += 1;
            info!(
                city_id = %record.city_id,
                "Traffic tiles successfully queried and results archived"
            );
        }

        info!(%summary, "Traffic tile job finished");
        Ok(summary)
    }

    fn run_city(&self, city_id: &str, polygon: &Polygon, summary: &mut JobSummary) {
        let range = tile_range_for_bounding_box(polygon, self.zoom);
        info!(city_id, range = %range, tiles = range.len(), "Computed tile range");

        for tile in range.tiles() {
            info!(city_id, x = tile.x, y = tile.y, zoom = %tile.zoom, "Querying traffic tile");

            let image = match self.maps.fetch_traffic_tile(&tile) {
                Ok(image) => image,
                Err(e) => {
                    error!(city_id, tile = %tile, error = %e, "Traffic tile query failed, skipping upload");
                    summary.skipped += 1;
                    continue;
                }
            };

            let path = ArchivePath::new(city_id, self.clock.now()).traffic_tile(&tile);
            debug!(city_id, path = %path, bytes = image.len(), "Archiving traffic tile");
            archive_item(&self.store, city_id, path, image, summary);
        }
    }
}
