//! Client configuration loaded via OrthoConfig.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

/// API base URL used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4555";
const SESSION_DIR_NAME: &str = "conference-admin";

fn default_session_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join(SESSION_DIR_NAME),
        None => PathBuf::from(format!(".{SESSION_DIR_NAME}")),
    }
}

/// Settings of the conference client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONFERENCE")]
pub struct ClientSettings {
    /// Base URL of the conference API.
    pub api_base_url: Option<String>,
    /// Directory holding the persisted session file.
    pub session_dir: Option<PathBuf>,
    /// Per-request timeout in seconds; `0` means no timeout.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Return the configured API base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn api_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL))
    }

    /// Return the configured session directory, falling back to the default.
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(default_session_dir)
    }

    /// Return the request timeout, if one is configured and non-zero.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
