//! Source of the version currently deployed on the server

#[cfg(test)]
use mockall::automock;

use crate::version::error::ManifestError;

/// Trait for fetching the server-side version
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetches the version advertised by the manifest
    ///
    /// # Returns
    /// * `Ok(String)` - The non-empty version string
    /// * `Err(ManifestError)` - If the request, the body or the `version` field is unusable
    async fn fetch_version(&self) -> Result<String, ManifestError>;
}
