//! Shared fixtures for end-to-end tests

use std::path::Path;

use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

use version_check::check::StalenessController;
use version_check::config::CheckConfig;
use version_check::platform::cache_storage::DirCacheStorage;
use version_check::platform::reload::SignalReloader;
use version_check::storage::marker::RefreshMarker;
use version_check::storage::sqlite::SqliteStore;
use version_check::version::http::HttpManifestSource;

pub type TestController =
    StalenessController<HttpManifestSource, SqliteStore, DirCacheStorage, SignalReloader>;

/// Client-side state that outlives a single controller, like a browser profile
pub struct Profile {
    pub dir: TempDir,
    pub reloader: SignalReloader,
}

impl Profile {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            reloader: SignalReloader::new(),
        }
    }

    pub fn cache_root(&self) -> std::path::PathBuf {
        self.dir.path().join("caches")
    }

    pub fn store_path(&self) -> std::path::PathBuf {
        self.dir.path().join("state.db")
    }

    pub fn add_cache(&self, name: &str) {
        let bucket = self.cache_root().join(name);
        std::fs::create_dir_all(&bucket).unwrap();
        std::fs::write(bucket.join("index.html"), "<html></html>").unwrap();
    }

    pub fn cache_exists(&self, name: &str) -> bool {
        self.cache_root().join(name).exists()
    }

    /// Builds a controller as a fresh page load would
    pub fn load(&self, server: &ServerGuard, config: CheckConfig) -> TestController {
        let source = HttpManifestSource::new(&server.url(), &config.server_file_path)
            .unwrap()
            .with_logs(config.logs);
        let store = open_store(&self.store_path());
        StalenessController::new(
            config,
            source,
            RefreshMarker::new(store),
            DirCacheStorage::new(self.cache_root()),
            self.reloader.clone(),
        )
    }
}

pub fn open_store(path: &Path) -> SqliteStore {
    SqliteStore::new(path).unwrap()
}

pub async fn mock_manifest(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
