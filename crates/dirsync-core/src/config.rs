//! Run configuration, read from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

/// Connection settings for the remote directory API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL every API path is appended to, without trailing slash.
    pub api_url: String,
    /// Static API key sent on every request.
    pub api_key: String,
    /// Header that carries the API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// Request timeout. `None` keeps the transport default.
    #[serde(default)]
    pub timeout: Option<Duration>,
}

fn default_api_key_header() -> String {
    DEFAULT_API_KEY_HEADER.into()
}

impl SyncConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_key_header: default_api_key_header(),
            timeout: None,
        }
    }

    /// Create configuration from `DIRSYNC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = lookup("DIRSYNC_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("DIRSYNC_API_URL is not set".into()))?;
        let api_key = lookup("DIRSYNC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config("DIRSYNC_API_KEY is not set".into()))?;

        let mut config = Self::new(api_url.trim(), api_key.trim());

        if let Some(header) = lookup("DIRSYNC_API_KEY_HEADER").filter(|v| !v.trim().is_empty()) {
            config.api_key_header = header.trim().to_string();
        }

        if let Some(raw) = lookup("DIRSYNC_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("DIRSYNC_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}
