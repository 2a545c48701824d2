//! Archive storage backends.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{ArchiveError, ArchiveResult};
use crate::provider::{redact_query, HttpClient};

/// Destination for archived job results.
pub trait ArchiveStore {
    /// Stores `data` under the relative object path `path`.
    fn put(&self, path: &str, data: Vec<u8>) -> ArchiveResult<()>;
}

impl<T: ArchiveStore + ?Sized> ArchiveStore for &T {
    fn put(&self, path: &str, data: Vec<u8>) -> ArchiveResult<()> {
        (**self).put(path, data)
    }
}

impl<T: ArchiveStore + ?Sized> ArchiveStore for Box<T> {
    fn put(&self, path: &str, data: Vec<u8>) -> ArchiveResult<()> {
        (**self).put(path, data)
    }
}

/// Rejects absolute paths and parent-directory components.
fn validate_object_path(path: &str) -> ArchiveResult<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.split('/').any(|part| part.is_empty() || part == "..");

    if invalid {
        return Err(ArchiveError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Stores objects as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalArchiveStore {
    root: PathBuf,
}

impl LocalArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArchiveStore for LocalArchiveStore {
    fn put(&self, path: &str, data: Vec<u8>) -> ArchiveResult<()> {
        validate_object_path(path)?;

        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| ArchiveError::CreateDirFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&target, &data).map_err(|source| ArchiveError::WriteFailed {
            path: target.clone(),
            source,
        })?;

        debug!(path = %target.display(), bytes = data.len(), "Stored archive object");
        Ok(())
    }
}

/// Uploads objects to a blob container over HTTP.
///
/// The container URL may carry a query string (such as a shared access
/// token); object paths are inserted before it. Objects are written as block
/// blobs.
pub struct HttpArchiveStore<C: HttpClient> {
    http_client: C,
    container_url: String,
}

impl<C: HttpClient> HttpArchiveStore<C> {
    pub fn new(http_client: C, container_url: impl Into<String>) -> Self {
        Self {
            http_client,
            container_url: container_url.into(),
        }
    }

    /// Full URL of an object inside the container.
    ///
    /// Each path segment is percent-encoded so characters such as `?`, `#`
    /// or `%` in a city id stay part of the blob name.
    pub fn object_url(&self, path: &str) -> String {
        let (base, query) = match self.container_url.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (self.container_url.as_str(), None),
        };

        let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
        let mut url = format!("{}/{}", base.trim_end_matches('/'), encoded.join("/"));
        if let Some(query) = query {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl<C: HttpClient> ArchiveStore for HttpArchiveStore<C> {
    fn put(&self, path: &str, data: Vec<u8>) -> ArchiveResult<()> {
        validate_object_path(path)?;

        let url = self.object_url(path);
        let bytes = data.len();
        self.http_client
            .put(&url, &[("x-ms-blob-type", "BlockBlob")], data)
            .map_err(|source| ArchiveError::UploadFailed {
                path: path.to_string(),
                source,
            })?;

        debug!(url = redact_query(&url), bytes, "Uploaded archive object");
        Ok(())
    }
}
