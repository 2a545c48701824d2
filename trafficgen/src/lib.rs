//! Trafficgen - synthetic traffic data collection
//!
//! This library samples random locations inside city polygons, projects city
//! bounding boxes onto web-mercator tiles, queries a mapping service for
//! route directions and traffic flow tiles, and archives the responses under
//! a city/time partitioned layout.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod coord;
pub mod jobs;
pub mod logging;
pub mod provider;
pub mod sampler;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
