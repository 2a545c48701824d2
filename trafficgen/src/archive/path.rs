//! Archive path convention.
//!
//! Results are partitioned by city and by the UTC minute they were produced:
//!
//! ```text
//! cityId=25/year=2017/month=11/day=29/hour=14/minute=32/1.json.gz
//! cityId=25/year=2017/month=11/day=29/hour=14/minute=32/map.4096.4073.13.traffic.png
//! ```
//!
//! Date components are not zero padded.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::coord::TileIndex;

/// Builds archive object paths for one city at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePath {
    city_id: String,
    timestamp: DateTime<Utc>,
}

impl ArchivePath {
    pub fn new(city_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            city_id: city_id.into(),
            timestamp,
        }
    }

    /// Directory prefix shared by every object of this city and minute.
    pub fn prefix(&self) -> String {
        let ts = &self.timestamp;
        format!(
            "cityId={}/year={}/month={}/day={}/hour={}/minute={}",
            self.city_id,
            ts.year(),
            ts.month(),
            ts.day(),
            ts.hour(),
            ts.minute()
        )
    }

    /// Path of the `sequence`-th gzipped route response.
    pub fn route(&self, sequence: u32) -> String {
        format!("{}/{}.json.gz", self.prefix(), sequence)
    }

    /// Path of a traffic tile image.
    pub fn traffic_tile(&self, tile: &TileIndex) -> String {
        format!(
            "{}/map.{}.{}.{}.traffic.png",
            self.prefix(),
            tile.x,
            tile.y,
            tile.zoom
        )
    }
}
