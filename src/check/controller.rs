//! Stale/fresh decision state machine

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::check::error::CheckError;
use crate::check::state::{Activation, CheckState};
use crate::config::{CheckConfig, LOG_PREFIX};
use crate::overlay::{self, Overlay};
use crate::platform::cache_storage::CacheStorage;
use crate::platform::reload::Reloader;
use crate::storage::KeyValueStore;
use crate::storage::marker::RefreshMarker;
use crate::version::compare::greater_than;
use crate::version::source::ManifestSource;

/// Compares the client version against the server manifest and forces a
/// cache-clear-and-reload when the client is behind.
///
/// Each call to [`activate`](Self::activate) with changed dependency values
/// starts a new check. Checks are numbered; a check that finishes after a
/// newer one has started leaves the state alone. Once a check has begun the
/// cache-clear-and-reload, no further check starts on this controller.
pub struct StalenessController<M, S, C, R> {
    config: CheckConfig,
    source: M,
    marker: RefreshMarker<S>,
    caches: C,
    reloader: R,
    state: Mutex<CheckState>,
    generation: AtomicU64,
    /// Set while (and after) a reload is being forced
    refreshing: AtomicBool,
    last_dependencies: Mutex<Option<Vec<Value>>>,
}

impl<M, S, C, R> StalenessController<M, S, C, R>
where
    M: ManifestSource,
    S: KeyValueStore,
    C: CacheStorage,
    R: Reloader,
{
    pub fn new(
        config: CheckConfig,
        source: M,
        marker: RefreshMarker<S>,
        caches: C,
        reloader: R,
    ) -> Self {
        Self {
            config,
            source,
            marker,
            caches,
            reloader,
            state: Mutex::new(CheckState::Idle),
            generation: AtomicU64::new(0),
            refreshing: AtomicBool::new(false),
            last_dependencies: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn state(&self) -> CheckState {
        *self.lock_state()
    }

    /// Overlay for the current state, `None` when nothing should be shown
    pub fn overlay(&self) -> Option<Overlay> {
        overlay::render(self.state(), &self.config)
    }

    /// Activates with the dependency values from the configuration
    pub async fn start(&self) -> Activation {
        let dependencies = self.config.dependencies.clone();
        self.activate(&dependencies).await
    }

    /// Runs a check unless `dependencies` equals the list seen by the previous activation.
    ///
    /// The first activation always runs, so an empty list checks exactly once.
    pub async fn activate(&self, dependencies: &[Value]) -> Activation {
        if !self.record_dependencies(dependencies) {
            self.print_debug("dependencies unchanged, skipping version check");
            return Activation::Unchanged;
        }

        self.run_check().await
    }

    async fn run_check(&self) -> Activation {
        let Some(generation) = self.begin_check() else {
            self.print_debug("reload already requested, skipping version check");
            return Activation::ReloadPending;
        };

        match self.marker.take() {
            Ok(false) => {}
            Ok(true) => {
                self.print_error(CheckError::ReloadDidNotResolve);
                return self.finish(generation, CheckState::Error);
            }
            Err(e) => {
                self.print_error(CheckError::from(e));
                return self.finish(generation, CheckState::Error);
            }
        }

        if !self.commit(generation, CheckState::Checking) {
            return Activation::Superseded;
        }

        let fetched = self.source.fetch_version().await;

        if !self.is_current(generation) {
            self.print_debug(format!(
                "dropping manifest result of superseded check #{}",
                generation
            ));
            return Activation::Superseded;
        }

        let next = match fetched {
            Ok(latest_version) => match self.decide(generation, &latest_version).await {
                Some(state) => state,
                None => return Activation::Superseded,
            },
            Err(e) => {
                self.print_error(CheckError::from(e));
                CheckState::Error
            }
        };

        self.finish(generation, next)
    }

    /// Returns `None` when a newer check started before the reload could begin
    async fn decide(&self, generation: u64, latest_version: &str) -> Option<CheckState> {
        let current_version = &self.config.current_version;
        self.print_info(format!("fetched server version {}", latest_version));

        if !greater_than(latest_version, current_version) {
            self.print_info(format!(
                "you already have the latest version: {}. no cache refresh needed.",
                current_version
            ));
            return Some(CheckState::UpToDate);
        }

        self.print_info(format!(
            "we have a new version - {}. should force refresh",
            latest_version
        ));

        if !self.begin_refresh(generation) {
            return None;
        }

        match self.refresh_cache_and_reload().await {
            Ok(()) => Some(CheckState::Stale),
            Err(e) => {
                self.refreshing.store(false, Ordering::SeqCst);
                self.print_error(e);
                Some(CheckState::Error)
            }
        }
    }

    /// Sets the marker, deletes every cache bucket and requests one reload.
    ///
    /// The marker must be stored before the reload; without it the next load
    /// cannot detect a reload that did not help.
    async fn refresh_cache_and_reload(&self) -> Result<(), CheckError> {
        self.print_info("clearing cache and hard reloading...");
        self.marker.set()?;

        match self.caches.keys().await {
            Ok(names) => {
                let results = join_all(names.iter().map(|name| self.caches.delete(name))).await;
                for (name, result) in names.iter().zip(results) {
                    if let Err(e) = result {
                        self.print_warn(format!("failed to delete cache {}: {}", name, e));
                    }
                }
            }
            Err(e) => self.print_warn(format!("failed to list caches: {}", e)),
        }

        self.reloader.reload().await?;
        Ok(())
    }

    /// Stores `dependencies` and reports whether they differ from the previous ones
    fn record_dependencies(&self, dependencies: &[Value]) -> bool {
        let mut last = self
            .last_dependencies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if last.as_deref() == Some(dependencies) {
            return false;
        }

        *last = Some(dependencies.to_vec());
        true
    }

    /// Numbers a new check, unless a reload is already being forced
    fn begin_check(&self) -> Option<u64> {
        let _guard = self.lock_state();
        if self.refreshing.load(Ordering::SeqCst) {
            return None;
        }

        Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claims the refresh for `generation` if it is still the newest check.
    ///
    /// Shares the state lock with [`begin_check`](Self::begin_check), so a
    /// newer check either supersedes this one before the marker is written or
    /// does not start at all.
    fn begin_refresh(&self, generation: u64) -> bool {
        let _guard = self.lock_state();
        if !self.is_current(generation) {
            return false;
        }

        self.refreshing.store(true, Ordering::SeqCst);
        true
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Writes `state` if `generation` is still the newest check
    fn commit(&self, generation: u64, state: CheckState) -> bool {
        let mut guard = self.lock_state();
        if !self.is_current(generation) {
            return false;
        }

        *guard = state;
        true
    }

    fn finish(&self, generation: u64, state: CheckState) -> Activation {
        if self.commit(generation, state) {
            Activation::Completed(state)
        } else {
            Activation::Superseded
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn print_info(&self, msg: impl Display) {
        if self.config.logs {
            info!("{}: {}", LOG_PREFIX, msg);
        }
    }

    fn print_debug(&self, msg: impl Display) {
        if self.config.logs {
            debug!("{}: {}", LOG_PREFIX, msg);
        }
    }

    fn print_warn(&self, msg: impl Display) {
        if self.config.logs {
            warn!("{}: {}", LOG_PREFIX, msg);
        }
    }

    fn print_error(&self, msg: impl Display) {
        if self.config.logs {
            error!("{}: {}", LOG_PREFIX, msg);
        }
    }
}
