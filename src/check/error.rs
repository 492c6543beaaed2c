use thiserror::Error;

use crate::platform::error::ReloadError;
use crate::storage::error::StoreError;
use crate::version::error::ManifestError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("server version is greater than local version after a forced reload")]
    ReloadDidNotResolve,

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Refresh marker storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("Reload failed: {0}")]
    Reload(#[from] ReloadError),
}
