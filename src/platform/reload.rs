//! Reload requests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::platform::error::ReloadError;

/// Trait for forcing a full reload of the client
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Reloader: Send + Sync {
    async fn reload(&self) -> Result<(), ReloadError>;
}

#[async_trait::async_trait]
impl<T: Reloader + ?Sized> Reloader for Box<T> {
    async fn reload(&self) -> Result<(), ReloadError> {
        (**self).reload().await
    }
}

/// Records reload requests for the host to act on.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct SignalReloader {
    requests: Arc<AtomicUsize>,
}

impl SignalReloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> bool {
        self.request_count() > 0
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Reloader for SignalReloader {
    async fn reload(&self) -> Result<(), ReloadError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Reloads by running an external program, e.g. a service restart
#[derive(Debug, Clone)]
pub struct CommandReloader {
    program: String,
    args: Vec<String>,
}

impl CommandReloader {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait::async_trait]
impl Reloader for CommandReloader {
    async fn reload(&self) -> Result<(), ReloadError> {
        info!("Running reload command {} {:?}", self.program, self.args);

        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .status()
            .await?;

        if !status.success() {
            return Err(ReloadError::Failed(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signal_reloader_clones_share_requests() {
        let reloader = SignalReloader::new();
        let handle = reloader.clone();

        assert!(!handle.requested());
        reloader.reload().await.unwrap();

        assert!(handle.requested());
        assert_eq!(handle.request_count(), 1);
    }

    #[tokio::test]
    async fn boxed_reloader_delegates() {
        let reloader = SignalReloader::new();
        let boxed: Box<dyn Reloader> = Box::new(reloader.clone());

        boxed.reload().await.unwrap();

        assert_eq!(reloader.request_count(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_reloader_reports_non_zero_exit() {
        let reloader = CommandReloader::new("false", Vec::new());

        let result = reloader.reload().await;

        assert!(matches!(result, Err(ReloadError::Failed(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_reloader_succeeds_on_zero_exit() {
        let reloader = CommandReloader::new("true", Vec::new());

        assert!(reloader.reload().await.is_ok());
    }

    #[tokio::test]
    async fn command_reloader_reports_missing_program() {
        let reloader = CommandReloader::new("version-check-no-such-program", Vec::new());

        let result = reloader.reload().await;

        assert!(matches!(result, Err(ReloadError::Spawn(_))));
    }
}
