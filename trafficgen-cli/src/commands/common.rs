//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use trafficgen::archive::{ArchiveStore, HttpArchiveStore, LocalArchiveStore};
use trafficgen::catalog::{CatalogSource, FileCatalogSource, HttpCatalogSource};
use trafficgen::config::{Config, Location};
use trafficgen::coord::ZoomLevel;
use trafficgen::provider::{MapsProvider, ReqwestClient};

use crate::error::CliError;

/// Settings shared by the job commands, overriding the environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct JobOverrides {
    /// City catalog URL or file (overrides CITIES_CONFIG_URL)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Archive container URL or directory (overrides the job's output variable)
    #[arg(long)]
    pub output: Option<String>,
}

/// Load configuration from the environment and apply CLI overrides.
pub fn load_config(overrides: &JobOverrides) -> Result<Config, CliError> {
    let mut config = Config::from_env()?;

    // CLI takes precedence, then environment
    if let Some(catalog) = &overrides.catalog {
        config.catalog = catalog.parse()?;
    }
    Ok(config)
}

/// Resolve the output location: CLI flag first, then the configured value.
pub fn resolve_output(
    cli_output: Option<&str>,
    configured: Result<&Location, trafficgen::config::ConfigError>,
) -> Result<Location, CliError> {
    match cli_output {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(configured?.clone()),
    }
}

/// Parse a zoom level argument.
pub fn parse_zoom(zoom: i32) -> Result<ZoomLevel, CliError> {
    Ok(ZoomLevel::new(zoom)?)
}

/// Build the shared HTTP client with the configured timeout.
pub fn http_client(config: &Config) -> Result<ReqwestClient, CliError> {
    Ok(ReqwestClient::with_timeout(config.http_timeout_secs)?)
}

/// Build the mapping service provider.
pub fn maps_provider(
    config: &Config,
    client: ReqwestClient,
) -> Result<MapsProvider<ReqwestClient>, CliError> {
    Ok(MapsProvider::new(
        client,
        config.maps_endpoint.clone(),
        config.subscription_key.clone(),
    )?)
}

/// Open the catalog at `location`.
pub fn catalog_source(location: &Location, client: ReqwestClient) -> Box<dyn CatalogSource> {
    match location {
        Location::Url(url) => Box::new(HttpCatalogSource::new(client, url.clone())),
        Location::Path(path) => Box::new(FileCatalogSource::new(path.clone())),
    }
}

/// Open the archive at `location`.
pub fn archive_store(location: &Location, client: ReqwestClient) -> Box<dyn ArchiveStore> {
    match location {
        Location::Url(url) => Box::new(HttpArchiveStore::new(client, url.clone())),
        Location::Path(path) => Box::new(LocalArchiveStore::new(path.clone())),
    }
}
