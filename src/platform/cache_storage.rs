//! Named cache buckets

use std::path::{Component, Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::platform::error::CacheStorageError;

/// Trait for enumerating and deleting named cache buckets
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CacheStorage: Send + Sync {
    /// Returns the names of all buckets
    async fn keys(&self) -> Result<Vec<String>, CacheStorageError>;

    /// Deletes a bucket
    ///
    /// # Returns
    /// * `Ok(true)` - The bucket existed and was deleted
    /// * `Ok(false)` - No bucket with this name exists
    async fn delete(&self, name: &str) -> Result<bool, CacheStorageError>;
}

/// Cache storage where every subdirectory of `root` is one bucket
pub struct DirCacheStorage {
    root: PathBuf,
}

impl DirCacheStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a bucket name to its directory, refusing anything but a single plain segment
    fn bucket_path(&self, name: &str) -> Result<PathBuf, CacheStorageError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(CacheStorageError::InvalidName(name.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl CacheStorage for DirCacheStorage {
    async fn keys(&self) -> Result<Vec<String>, CacheStorageError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache root {:?} does not exist", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheStorageError> {
        let path = self.bucket_path(name)?;

        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                debug!("Deleted cache bucket {:?}", path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
