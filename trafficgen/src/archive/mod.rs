//! Archiving of job results.
//!
//! Job outputs are written as objects under a per-city, per-minute path (see
//! [`ArchivePath`]) into an [`ArchiveStore`]: a local directory or a blob
//! container reached over HTTP. Route responses are gzip-compressed before
//! storing; tile images are stored as-is.

mod clock;
mod path;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use path::ArchivePath;
pub use store::{ArchiveStore, HttpArchiveStore, LocalArchiveStore};

#[cfg(test)]
pub use store::tests::MemoryArchiveStore;

use std::io::{self, Write};
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::provider::ProviderError;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while archiving results.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Object path is empty, absolute, or escapes the archive root.
    #[error("Invalid archive path: '{0}'")]
    InvalidPath(String),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Remote upload was refused or failed in transit.
    #[error("Upload of {path} failed: {source}")]
    UploadFailed {
        path: String,
        #[source]
        source: ProviderError,
    },

    /// Gzip compression failed.
    #[error("Compression failed: {0}")]
    Compression(#[source] io::Error),
}

/// Gzip-compresses a payload with the default compression level.
pub fn gzip(data: &[u8]) -> ArchiveResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data).map_err(ArchiveError::Compression)?;
    encoder.finish().map_err(ArchiveError::Compression)
}
