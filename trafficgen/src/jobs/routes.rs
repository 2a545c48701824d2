//! Random route job.
//!
//! For every city, samples `2 × routes_per_city` points inside the city
//! polygon, pairs them in acceptance order (`(p0, p1)`, `(p2, p3)`, ...) and
//! requests traffic-aware route directions for each pair. Responses are
//! gzipped and archived as `{n}.json.gz`, where `n` counts responses received
//! for the city starting at 1.

use rand::Rng;
use tracing::{debug, error, info};

use super::{archive_item, JobError, JobResult, JobSummary};
use crate::archive::{gzip, ArchivePath, ArchiveStore, Clock, SystemClock};
use crate::catalog::CatalogSource;
use crate::coord::Polygon;
use crate::provider::{HttpClient, MapsProvider};
use crate::sampler::PolygonSampler;

/// Job that archives route directions between random points of each city.
pub struct RandomRouteJob<C: HttpClient, S: ArchiveStore> {
    maps: MapsProvider<C>,
    store: S,
    clock: Box<dyn Clock>,
    routes_per_city: usize,
    sampler: PolygonSampler,
}

impl<C: HttpClient, S: ArchiveStore> RandomRouteJob<C, S> {
    /// Creates a job with the system clock and an unbounded sampler.
    pub fn new(maps: MapsProvider<C>, store: S, routes_per_city: usize) -> Self {
        Self {
            maps,
            store,
            clock: Box::new(SystemClock),
            routes_per_city,
            sampler: PolygonSampler::unbounded(),
        }
    }

    /// Replaces the clock used for archive timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the point sampler, typically to set an attempt cap.
    pub fn with_sampler(mut self, sampler: PolygonSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Runs the job once over the whole catalog.
    pub fn run<R: Rng + ?Sized>(
        &self,
        catalog: &dyn CatalogSource,
        rng: &mut R,
    ) -> JobResult<JobSummary> {
        info!(
            routes_per_city = self.routes_per_city,
            max_attempts = ?self.sampler.max_attempts(),
            "Random route job started"
        );

        let records = catalog.load().inspect_err(|e| {
            error!(error = %e, "Failed to load city catalog");
        })?;
        info!(cities = records.len(), "Retrieved city catalog");

        let mut summary = JobSummary::default();
        for (index, record) in records.iter().enumerate() {
            let polygon = record.to_polygon(index).inspect_err(|e| {
                error!(index, error = %e, "Invalid catalog record");
            })?;

            info!(city_id = %record.city_id, "Generating random coordinates");
            self.run_city(&record.city_id, &polygon, rng, &mut summary)?;

            summary.cities += 1;
            info!(
                city_id = %record.city_id,
                "Random routes successfully queried and results archived"
            );
        }

        info!(%summary, "Random route job finished");
        Ok(summary)
    }

    fn run_city<R: Rng + ?Sized>(
        &self,
        city_id: &str,
        polygon: &Polygon,
        rng: &mut R,
        summary: &mut JobSummary,
    ) -> JobResult<()> {
        let count = self
            .routes_per_city
            .checked_mul(2)
            .ok_or(JobError::RouteCountOverflow(self.routes_per_city))?;

        let points = self
            .sampler
            .sample(polygon, count, rng)
            .map_err(|source| {
                error!(city_id, error = %source, "Failed to sample coordinates");
                JobError::Sampling {
                    city_id: city_id.to_string(),
                    source,
                }
            })?;

        let mut sequence: u32 = 1;
        for pair in points.chunks_exact(2) {
            let (origin, destination) = (pair[0], pair[1]);

            let body = match self.maps.fetch_route(origin, destination) {
                Ok(body) => body,
                Err(e) => {
                    error!(city_id, error = %e, "Route query failed, skipping upload");
                    summary.skipped += 1;
                    continue;
                }
            };

            let compressed = match gzip(&body) {
                Ok(compressed) => compressed,
                Err(e) => {
                    error!(city_id, error = %e, "Failed to compress route response");
                    summary.skipped += 1;
                    continue;
                }
            };

            let path = ArchivePath::new(city_id, self.clock.now()).route(sequence);
            debug!(city_id, path = %path, origin = %origin, destination = %destination, "Archiving route");
            archive_item(&self.store, city_id, path, compressed, summary);
            sequence += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{FixedClock, MemoryArchiveStore};
    use crate::catalog::{CatalogError, CityRecord, StaticCatalogSource};
    use crate::provider::{MockHttpClient, ProviderError};
    use crate::sampler::SamplerError;
    use chrono::{TimeZone, Utc};
    use flate2::read::GzDecoder;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Read;

    const ENDPOINT: &str = "https://maps.example.invalid/";

    fn catalog(polygon: &str) -> StaticCatalogSource {
        StaticCatalogSource::new(vec![CityRecord {
            city_id: "25".to_string(),
            polygon: polygon.to_string(),
        }])
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2017, 11, 29, 14, 32, 23).unwrap())
    }

    fn job<'a>(
        client: &'a MockHttpClient,
        store: &'a MemoryArchiveStore,
        routes: usize,
    ) -> RandomRouteJob<&'a MockHttpClient, &'a MemoryArchiveStore> {
        let maps = MapsProvider::new(client, ENDPOINT, "kvsecret").unwrap();
        RandomRouteJob::new(maps, store, routes)
            .with_clock(clock())
            .with_sampler(PolygonSampler::with_max_attempts(1_000_000))
    }

    #[test]
    fn test_archives_one_gzip_per_route() {
        let client = MockHttpClient::new(Ok(b"mock data from Maps API".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(11);

        let summary = job(&client, &store, 100)
            .run(&catalog("0 0, 0 1, 1 1, 1 0, 0 0"), &mut rng)
            .unwrap();

        assert_eq!(
            summary,
            JobSummary {
                cities: 1,
                archived: 100,
                skipped: 0
            }
        );
        assert_eq!(client.get_urls().len(), 100);

        let objects = store.objects.lock().unwrap();
        for (n, (path, data)) in objects.iter().enumerate() {
            assert_eq!(
                path,
                &format!(
                    "cityId=25/year=2017/month=11/day=29/hour=14/minute=32/{}.json.gz",
                    n + 1
                )
            );

            let mut decoded = String::new();
            GzDecoder::new(data.as_slice())
                .read_to_string(&mut decoded)
                .unwrap();
            assert_eq!(decoded, "mock data from Maps API");
        }
    }

    #[test]
    fn test_query_points_lie_inside_city() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(3);

        job(&client, &store, 5)
            .run(&catalog("0 0, 1 1, 1 0"), &mut rng)
            .unwrap();

        let polygon: Polygon = "0 0, 1 1, 1 0".parse().unwrap();
        for url in client.get_urls() {
            let query = url
                .split("&query=")
                .nth(1)
                .and_then(|rest| rest.split('&').next())
                .unwrap();

            for waypoint in query.split(':') {
                let (lat, lon) = waypoint.split_once(',').unwrap();
                let point = crate::coord::Coordinate::new(lon.parse().unwrap(), lat.parse().unwrap());
                assert!(polygon.contains(&point), "{} outside city", waypoint);
            }
        }
    }

    #[test]
    fn test_failed_queries_are_skipped() {
        let client = MockHttpClient::new(Err(ProviderError::HttpError("HTTP 500".to_string())));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let summary = job(&client, &store, 4)
            .run(&catalog("0 0, 0 1, 1 1, 1 0"), &mut rng)
            .unwrap();

        assert_eq!(summary.cities, 1);
        assert_eq!(summary.archived, 0);
        assert_eq!(summary.skipped, 4);
        assert!(store.paths().is_empty());
    }

    #[test]
    fn test_empty_responses_are_skipped() {
        let client = MockHttpClient::new(Ok(vec![]));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let summary = job(&client, &store, 2)
            .run(&catalog("0 0, 0 1, 1 1, 1 0"), &mut rng)
            .unwrap();

        assert_eq!(summary.skipped, 2);
        assert!(store.paths().is_empty());
    }

    #[test]
    fn test_invalid_record_aborts() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = StaticCatalogSource::new(vec![CityRecord {
            city_id: String::new(),
            polygon: "0 0, 0 1, 1 1".to_string(),
        }]);

        let result = job(&client, &store, 1).run(&catalog, &mut rng);

        assert!(matches!(
            result,
            Err(JobError::Catalog(CatalogError::MissingField { index: 0, .. }))
        ));
        assert!(client.get_urls().is_empty());
    }

    #[test]
    fn test_degenerate_polygon_aborts() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = job(&client, &store, 1).run(&catalog("0 0, 1 0, 2 0"), &mut rng);

        match result {
            Err(JobError::Sampling { city_id, source }) => {
                assert_eq!(city_id, "25");
                assert!(matches!(source, SamplerError::InvalidPolygon(_)));
            }
            other => panic!("Expected sampling error, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_route_count_aborts() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = job(&client, &store, usize::MAX / 2 + 1)
            .run(&catalog("0 0, 0 1, 1 1, 1 0"), &mut rng);

        assert!(matches!(result, Err(JobError::RouteCountOverflow(_))));
        assert!(client.get_urls().is_empty());
    }

    #[test]
    fn test_huge_route_count_exhausts_sampling() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = job(&client, &store, usize::MAX / 8)
            .with_sampler(PolygonSampler::with_max_attempts(10))
            .run(&catalog("0 0, 0 1, 1 1, 1 0"), &mut rng);

        assert!(matches!(
            result,
            Err(JobError::Sampling {
                source: SamplerError::SamplingExhausted { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_sampling_cap_aborts() {
        let client = MockHttpClient::new(Ok(b"{}".to_vec()));
        let store = MemoryArchiveStore::default();
        let mut rng = StdRng::seed_from_u64(1);

        let result = job(&client, &store, 10)
            .with_sampler(PolygonSampler::with_max_attempts(10))
            .run(&catalog("0 0, 1 1, 1 0.999999"), &mut rng);

        assert!(matches!(
            result,
            Err(JobError::Sampling {
                source: SamplerError::SamplingExhausted { .. },
                ..
            })
        ));
    }
}
