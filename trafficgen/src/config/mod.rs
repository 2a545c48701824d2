//! Job configuration.
//!
//! Settings are read from the process environment exactly once, at the
//! program boundary, and passed down as a [`Config`] value. Nothing below this
//! module touches environment state.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `CITIES_CONFIG_URL` | catalog URL or file path | required |
//! | `MAPS_ENDPOINT` | mapping service base URL | required |
//! | `MAPS_SUBSCRIPTION_KEY` | mapping service key | required |
//! | `NUM_OF_ROUTES_PER_CITY` | routes requested per city | 50 |
//! | `TRAFFICROUTES_OUTPUT_URL` | route archive URL or directory | routes job only |
//! | `TRAFFICTILES_OUTPUT_URL` | tile archive URL or directory | tiles job only |
//! | `TRAFFIC_TILE_ZOOM` | tile grid zoom level | 13 |
//! | `MAX_SAMPLING_ATTEMPTS` | rejection sampling cap per city | 10 000 000 |
//! | `HTTP_TIMEOUT_SECS` | request timeout | 30 |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::coord::ZoomLevel;
use crate::provider::DEFAULT_TIMEOUT_SECS;

pub const ENV_CATALOG: &str = "CITIES_CONFIG_URL";
pub const ENV_MAPS_ENDPOINT: &str = "MAPS_ENDPOINT";
pub const ENV_MAPS_KEY: &str = "MAPS_SUBSCRIPTION_KEY";
pub const ENV_ROUTES_PER_CITY: &str = "NUM_OF_ROUTES_PER_CITY";
pub const ENV_ROUTES_OUTPUT: &str = "TRAFFICROUTES_OUTPUT_URL";
pub const ENV_TILES_OUTPUT: &str = "TRAFFICTILES_OUTPUT_URL";
pub const ENV_TILE_ZOOM: &str = "TRAFFIC_TILE_ZOOM";
pub const ENV_MAX_SAMPLING_ATTEMPTS: &str = "MAX_SAMPLING_ATTEMPTS";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT_SECS";

/// Default number of routes requested per city.
pub const DEFAULT_ROUTES_PER_CITY: usize = 50;

/// Zoom level of the traffic tile grid.
pub const DEFAULT_TILE_ZOOM: ZoomLevel = ZoomLevel::saturating(13);

/// Default cap on rejection sampling draws per city.
pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: u64 = 10_000_000;

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    /// A setting has an unusable value.
    #[error("Invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Where to read from or write to: a remote URL or a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(String),
    Path(PathBuf),
}

impl Location {
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }
}

impl FromStr for Location {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::Invalid {
                name: "location",
                value: s.to_string(),
                reason: "empty location".to_string(),
            });
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Location::Url(s.to_string()))
        } else {
            Ok(Location::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Url(url) => write!(f, "{}", crate::provider::redact_query(url)),
            Location::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolved settings for both jobs.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub catalog: Location,
    pub maps_endpoint: String,
    pub subscription_key: String,
    pub routes_per_city: usize,
    pub routes_output: Option<Location>,
    pub tiles_output: Option<Location>,
    pub tile_zoom: ZoomLevel,
    pub max_sampling_attempts: u64,
    pub http_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("catalog", &self.catalog)
            .field("maps_endpoint", &self.maps_endpoint)
            .field("subscription_key", &"<redacted>")
            .field("routes_per_city", &self.routes_per_city)
            .field("routes_output", &self.routes_output)
            .field("tiles_output", &self.tiles_output)
            .field("tile_zoom", &self.tile_zoom)
            .field("max_sampling_attempts", &self.max_sampling_attempts)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let catalog = parse_location(ENV_CATALOG, &require(ENV_CATALOG)?)?;
        let maps_endpoint = require(ENV_MAPS_ENDPOINT)?;
        let subscription_key = require(ENV_MAPS_KEY)?;

        let routes_per_city = match get(ENV_ROUTES_PER_CITY) {
            Some(raw) => parse_positive(ENV_ROUTES_PER_CITY, &raw)?,
            None => DEFAULT_ROUTES_PER_CITY,
        };

        let routes_output = get(ENV_ROUTES_OUTPUT)
            .map(|raw| parse_location(ENV_ROUTES_OUTPUT, &raw))
            .transpose()?;
        let tiles_output = get(ENV_TILES_OUTPUT)
            .map(|raw| parse_location(ENV_TILES_OUTPUT, &raw))
            .transpose()?;

        let tile_zoom = match get(ENV_TILE_ZOOM) {
            Some(raw) => parse_zoom(ENV_TILE_ZOOM, &raw)?,
            None => DEFAULT_TILE_ZOOM,
        };

        let max_sampling_attempts = match get(ENV_MAX_SAMPLING_ATTEMPTS) {
            Some(raw) => parse_positive(ENV_MAX_SAMPLING_ATTEMPTS, &raw)?,
            None => DEFAULT_MAX_SAMPLING_ATTEMPTS,
        };

        let http_timeout_secs = match get(ENV_HTTP_TIMEOUT) {
            Some(raw) => parse_positive(ENV_HTTP_TIMEOUT, &raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            catalog,
            maps_endpoint,
            subscription_key,
            routes_per_city,
            routes_output,
            tiles_output,
            tile_zoom,
            max_sampling_attempts,
            http_timeout_secs,
        })
    }

    /// Route archive location, required by the routes job.
    pub fn require_routes_output(&self) -> Result<&Location, ConfigError> {
        self.routes_output
            .as_ref()
            .ok_or(ConfigError::Missing(ENV_ROUTES_OUTPUT))
    }

    /// Tile archive location, required by the tiles job.
    pub fn require_tiles_output(&self) -> Result<&Location, ConfigError> {
        self.tiles_output
            .as_ref()
            .ok_or(ConfigError::Missing(ENV_TILES_OUTPUT))
    }

    /// Overrides the number of routes per city.
    pub fn with_routes_per_city(mut self, routes: usize) -> Self {
        self.routes_per_city = routes;
        self
    }

    /// Overrides the tile zoom level.
    pub fn with_tile_zoom(mut self, zoom: ZoomLevel) -> Self {
        self.tile_zoom = zoom;
        self
    }
}

fn parse_location(name: &'static str, raw: &str) -> Result<Location, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: "expected a URL or a path".to_string(),
    })
}

fn parse_positive<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default,
    T::Err: fmt::Display,
{
    let value: T = raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    if value == T::default() {
        return Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn parse_zoom(name: &'static str, raw: &str) -> Result<ZoomLevel, ConfigError> {
    let zoom: i32 = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    ZoomLevel::new(zoom).map_err(|e| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
