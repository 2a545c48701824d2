//! Mapping service provider abstraction
//!
//! This module wraps the third-party mapping service behind a small HTTP
//! client seam so the jobs can be exercised without network access.
//!
//! ```ignore
//! use trafficgen::provider::{MapsProvider, ReqwestClient};
//!
//! let http_client = ReqwestClient::new()?;
//! let maps = MapsProvider::new(http_client, endpoint, subscription_key)?;
//! let png = maps.fetch_traffic_tile(&tile)?;
//! ```

mod http;
mod maps;
mod types;

pub use http::{redact_query, HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use maps::MapsProvider;
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
