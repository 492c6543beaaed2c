//! Manifest source backed by a JSON file served over HTTP

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{FETCH_TIMEOUT_MS, LOG_PREFIX};
use crate::version::error::ManifestError;
use crate::version::source::ManifestSource;

/// Fetches `{"version": "..."}` from `<base_url><server_file_path>`
pub struct HttpManifestSource {
    client: reqwest::Client,
    url: String,
    logs: bool,
}

impl HttpManifestSource {
    /// Creates a source for the manifest at `server_file_path` relative to `base_url`
    pub fn new(base_url: &str, server_file_path: &str) -> Result<Self, ManifestError> {
        Self::with_timeout(
            base_url,
            server_file_path,
            Duration::from_millis(FETCH_TIMEOUT_MS),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        server_file_path: &str,
        timeout: Duration,
    ) -> Result<Self, ManifestError> {
        let client = reqwest::Client::builder()
            .user_agent("version-check")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: Self::join_url(base_url, server_file_path),
            logs: true,
        })
    }

    /// Enables or silences this source's diagnostics, like `CheckConfig::logs`
    pub fn with_logs(mut self, logs: bool) -> Self {
        self.logs = logs;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn join_url(base_url: &str, path: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Extract the `version` field; an empty string counts as missing
    fn version_from(&self, manifest: &Value) -> Result<String, ManifestError> {
        match manifest.get("version") {
            Some(Value::String(version)) if !version.is_empty() => Ok(version.clone()),
            None | Some(Value::Null) | Some(Value::String(_)) => {
                Err(ManifestError::MissingVersion(self.url.clone()))
            }
            Some(other) => Err(ManifestError::InvalidResponse(format!(
                "\"version\" is not a string: {}",
                other
            ))),
        }
    }
}

#[async_trait::async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_version(&self) -> Result<String, ManifestError> {
        if self.logs {
            debug!("{}: fetching manifest from {}", LOG_PREFIX, self.url);
        }

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if !status.is_success() {
            if self.logs {
                warn!(
                    "{}: manifest server returned status {}: {}",
                    LOG_PREFIX, status, self.url
                );
            }
            return Err(ManifestError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let manifest: Value = response.json().await.map_err(|e| {
            if self.logs {
                warn!("{}: failed to parse manifest response: {}", LOG_PREFIX, e);
            }
            ManifestError::InvalidResponse(e.to_string())
        })?;

        self.version_from(&manifest)
    }
}
