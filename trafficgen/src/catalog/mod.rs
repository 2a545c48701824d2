//! City polygon catalog.
//!
//! The catalog is a JSON array of records:
//!
//! ```json
//! [{ "cityId": "25", "polygon": "0 0, 0 1, 1 1, 1 0, 0 0" }]
//! ```
//!
//! It can be fetched over HTTP (for example a blob URL carrying a read
//! token) or read from a local file.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::coord::{CoordError, Polygon};
use crate::provider::{redact_query, HttpClient, ProviderError};

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Remote catalog could not be downloaded.
    #[error("Failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ProviderError,
    },

    /// Local catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not a JSON array of city records.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Catalog parsed but holds no cities.
    #[error("Catalog contains no cities")]
    Empty,

    /// A record is missing a required field.
    #[error("Record [{index}] in catalog: '{field}' field empty or not found")]
    MissingField { index: usize, field: &'static str },

    /// A record's polygon cannot be parsed.
    #[error("Record [{index}] (cityId {city_id}) has an invalid polygon: {source}")]
    InvalidPolygon {
        index: usize,
        city_id: String,
        #[source]
        source: CoordError,
    },
}

/// One city entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    #[serde(rename = "cityId", default)]
    pub city_id: String,

    /// Comma-separated `"lon lat"` ring.
    #[serde(default)]
    pub polygon: String,
}

impl CityRecord {
    /// Checks that both fields are present and non-blank.
    ///
    /// `index` is the record's position in the catalog, used in errors.
    pub fn validate(&self, index: usize) -> CatalogResult<()> {
        if self.city_id.trim().is_empty() {
            return Err(CatalogError::MissingField {
                index,
                field: "cityId",
            });
        }
        if self.polygon.trim().is_empty() {
            return Err(CatalogError::MissingField {
                index,
                field: "polygon",
            });
        }
        Ok(())
    }

    /// Validates the record and parses its polygon.
    pub fn to_polygon(&self, index: usize) -> CatalogResult<Polygon> {
        self.validate(index)?;
        self.polygon
            .parse()
            .map_err(|source| CatalogError::InvalidPolygon {
                index,
                city_id: self.city_id.clone(),
                source,
            })
    }
}

/// Parses a catalog document.
///
/// # Errors
///
/// Fails on malformed JSON or an empty array. Individual records are not
/// validated here so one bad entry does not hide the others from the caller.
pub fn parse_catalog(bytes: &[u8]) -> CatalogResult<Vec<CityRecord>> {
    let records: Vec<CityRecord> = serde_json::from_slice(bytes)?;
    if records.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(records)
}

/// Source of catalog records.
pub trait CatalogSource {
    /// Loads and parses the full catalog.
    fn load(&self) -> CatalogResult<Vec<CityRecord>>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for Box<T> {
    fn load(&self) -> CatalogResult<Vec<CityRecord>> {
        (**self).load()
    }
}

/// Catalog fetched with an HTTP GET.
pub struct HttpCatalogSource<C: HttpClient> {
    http_client: C,
    url: String,
}

impl<C: HttpClient> HttpCatalogSource<C> {
    pub fn new(http_client: C, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
        }
    }
}

impl<C: HttpClient> CatalogSource for HttpCatalogSource<C> {
    fn load(&self) -> CatalogResult<Vec<CityRecord>> {
        let bytes = self
            .http_client
            .get(&self.url)
            .map_err(|source| CatalogError::Fetch {
                url: redact_query(&self.url).to_string(),
                source,
            })?;

        debug!(url = redact_query(&self.url), bytes = bytes.len(), "Downloaded catalog");
        parse_catalog(&bytes)
    }
}

/// Catalog read from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalogSource {
    fn load(&self) -> CatalogResult<Vec<CityRecord>> {
        let bytes = fs::read(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "Read catalog");
        parse_catalog(&bytes)
    }
}

/// Catalog held in memory, mainly for tests and one-off runs.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    records: Vec<CityRecord>,
}

impl StaticCatalogSource {
    pub fn new(records: Vec<CityRecord>) -> Self {
        Self { records }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load(&self) -> CatalogResult<Vec<CityRecord>> {
        if self.records.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"cityId": "25", "polygon": "0 0, 0 1, 1 1, 1 0, 0 0"},
        {"cityId": "26", "polygon": "0 0, 0 .1, 1 .1, 1 0"}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let records = parse_catalog(CATALOG.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].city_id, "25");
        assert_eq!(records[1].polygon, "0 0, 0 .1, 1 .1, 1 0");
    }

    #[test]
    fn test_parse_empty_catalog() {
        assert!(matches!(parse_catalog(b"[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_parse_malformed_catalog() {
        assert!(matches!(
            parse_catalog(br#"{"mock_key": "mock_value"}"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let records = parse_catalog(br#"[{"polygon": "0 0, 1 1, 1 0"}, {"cityId": "7"}]"#).unwrap();

        assert!(matches!(
            records[0].validate(0),
            Err(CatalogError::MissingField {
                index: 0,
                field: "cityId"
            })
        ));
        assert!(matches!(
            records[1].validate(1),
            Err(CatalogError::MissingField {
                index: 1,
                field: "polygon"
            })
        ));
    }

    #[test]
    fn test_to_polygon() {
        let record = CityRecord {
            city_id: "25".to_string(),
            polygon: "0 0, 0 1, 1 1, 1 0, 0 0".to_string(),
        };

        let polygon = record.to_polygon(0).unwrap();
        assert_eq!(polygon.vertices().len(), 4);
    }

    #[test]
    fn test_to_polygon_reports_city() {
        let record = CityRecord {
            city_id: "9".to_string(),
            polygon: "0 0, 1".to_string(),
        };

        match record.to_polygon(3) {
            Err(CatalogError::InvalidPolygon { index, city_id, .. }) => {
                assert_eq!(index, 3);
                assert_eq!(city_id, "9");
            }
            other => panic!("Expected InvalidPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_serializes_with_camel_case_id() {
        let record = CityRecord {
            city_id: "25".to_string(),
            polygon: "0 0, 1 1, 1 0".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""cityId":"25""#));
    }

    #[test]
    fn test_http_source() {
        let client = MockHttpClient::new(Ok(CATALOG.as_bytes().to_vec()));
        let source = HttpCatalogSource::new(&client, "https://store.invalid/cities.json?sig=x");

        let records = source.load().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            client.get_urls(),
            vec!["https://store.invalid/cities.json?sig=x".to_string()]
        );
    }

    #[test]
    fn test_http_source_fetch_error_redacts_token() {
        let client = MockHttpClient::new(Err(ProviderError::HttpError("HTTP 403".to_string())));
        let source = HttpCatalogSource::new(client, "https://store.invalid/cities.json?sig=secret");

        let err = source.load().unwrap_err();

        assert!(matches!(err, CatalogError::Fetch { .. }));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let records = FileCatalogSource::new(file.path()).load().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCatalogSource::new(dir.path().join("missing.json"));

        assert!(matches!(source.load(), Err(CatalogError::Read { .. })));
    }

    #[test]
    fn test_static_source() {
        let source = StaticCatalogSource::new(vec![]);
        assert!(matches!(source.load(), Err(CatalogError::Empty)));
    }
}
