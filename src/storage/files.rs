//! Base-directory file access for the `/files/` routes.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for file operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing readable as a regular file exists at the path.
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),
    /// The path exists but could not be read, or could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Files rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// An empty `base` resolves names against the working directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Join `name` onto the base directory.
    ///
    /// Leading slashes are dropped so the name always stays relative.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.base.join(name.trim_start_matches('/'))
    }

    /// Whether `path` names an existing regular file.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    pub async fn read_all(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        if !self.exists(path).await {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        tokio::fs::read(path)
            .await
            .map_err(|e| StorageError::from_io(path, e))
    }

    /// Create or truncate `path` and write `contents`.
    ///
    /// A missing parent directory is an Io error, not NotFound.
    pub async fn write_all(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
