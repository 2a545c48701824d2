//! CLI error types.

use std::fmt;

use trafficgen::config::ConfigError;
use trafficgen::coord::CoordError;
use trafficgen::jobs::JobError;
use trafficgen::logging::LoggingError;
use trafficgen::provider::ProviderError;
use trafficgen::sampler::SamplerError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration is missing or invalid
    Config(String),
    /// Logging could not be set up
    Logging(LoggingError),
    /// Mapping service client could not be created
    Provider(ProviderError),
    /// A job run was aborted
    Job(JobError),
    /// Polygon or zoom argument is invalid
    Coord(CoordError),
    /// Points could not be sampled
    Sampling(SamplerError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Coord(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Provider(e) => write!(f, "Maps provider error: {}", e),
            CliError::Job(e) => write!(f, "Job failed: {}", e),
            CliError::Coord(e) => write!(f, "{}", e),
            CliError::Sampling(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Logging(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Job(e) => Some(e),
            CliError::Coord(e) => Some(e),
            CliError::Sampling(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<JobError> for CliError {
    fn from(e: JobError) -> Self {
        CliError::Job(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::Coord(e)
    }
}

impl From<SamplerError> for CliError {
    fn from(e: SamplerError) -> Self {
        CliError::Sampling(e)
    }
}
