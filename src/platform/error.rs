use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheStorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cache name: {0}")]
    InvalidName(String),
}

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("Failed to spawn reload command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Reload command exited with {0}")]
    Failed(std::process::ExitStatus),
}
