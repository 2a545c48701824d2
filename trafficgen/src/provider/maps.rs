//! Mapping service queries for route directions and traffic flow tiles.
//!
//! # API Endpoints
//!
//! Both queries are relative to a configurable service endpoint:
//! - Route directions: `{endpoint}route/directions/json?api-version=1.0&subscription-key={key}&query={lat},{lon}:{lat},{lon}&traffic=true&computeTravelTimeFor=all`
//! - Traffic flow tile: `{endpoint}traffic/flow/tile/png?api-version=1.0&subscription-key={key}&style=relative&zoom={z}&x={x}&y={y}&thickness=1`
//!
//! Tile coordinates are standard XYZ indices, identical to [`TileIndex`].

use crate::coord::{Coordinate, TileIndex};

use super::http::{redact_query, HttpClient};
use super::types::ProviderError;

const API_VERSION: &str = "1.0";

/// Client for the mapping service.
pub struct MapsProvider<C: HttpClient> {
    http_client: C,
    endpoint: String,
    subscription_key: String,
}

impl<C: HttpClient> MapsProvider<C> {
    /// Creates a provider for the given endpoint and subscription key.
    ///
    /// A trailing `/` is appended to the endpoint when missing.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidConfig` if the endpoint or key is blank.
    pub fn new(
        http_client: C,
        endpoint: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let mut endpoint = endpoint.into().trim().to_string();
        let subscription_key = subscription_key.into();

        if endpoint.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "maps endpoint is empty".to_string(),
            ));
        }
        if subscription_key.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "maps subscription key is empty".to_string(),
            ));
        }
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Ok(Self {
            http_client,
            endpoint,
            subscription_key,
        })
    }

    /// Base endpoint, always ending with `/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds a route directions query between two points.
    ///
    /// The service expects `latitude,longitude` order for each waypoint.
    pub fn routes_query(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}route/directions/json?api-version={}&subscription-key={}\
             &query={},{}:{},{}&traffic=true&computeTravelTimeFor=all",
            self.endpoint,
            API_VERSION,
            self.subscription_key,
            origin.lat,
            origin.lon,
            destination.lat,
            destination.lon
        )
    }

    /// Builds a relative-style traffic flow tile query.
    pub fn traffic_tile_query(&self, tile: &TileIndex) -> String {
        format!(
            "{}traffic/flow/tile/png?api-version={}&subscription-key={}\
             &style=relative&zoom={}&x={}&y={}&thickness=1",
            self.endpoint, API_VERSION, self.subscription_key, tile.zoom, tile.x, tile.y
        )
    }

    /// Executes a query and returns the response payload.
    ///
    /// # Errors
    ///
    /// Propagates transport errors and reports an empty body as
    /// `ProviderError::EmptyResponse`.
    pub fn fetch(&self, query: &str) -> Result<Vec<u8>, ProviderError> {
        let body = self.http_client.get(query)?;
        if body.is_empty() {
            return Err(ProviderError::EmptyResponse(redact_query(query).to_string()));
        }
        Ok(body)
    }

    /// Fetches route directions between two points.
    pub fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<u8>, ProviderError> {
        self.fetch(&self.routes_query(origin, destination))
    }

    /// Fetches a traffic flow tile as PNG bytes.
    pub fn fetch_traffic_tile(&self, tile: &TileIndex) -> Result<Vec<u8>, ProviderError> {
        self.fetch(&self.traffic_tile_query(tile))
    }
}
