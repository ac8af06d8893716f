//! Workspace connection settings for the bundled transport.

use std::time::Duration;

pub const HOST_VAR: &str = "DATABRICKS_HOST";
pub const TOKEN_VAR: &str = "DATABRICKS_TOKEN";
pub const TIMEOUT_VAR: &str = "GENIE_HTTP_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    #[error("invalid GENIE_HTTP_TIMEOUT_SECS value {0:?}: expected whole seconds")]
    InvalidTimeout(String),
}

/// Where and how to reach a workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Scheme and authority, without a trailing slash.
    pub host: String,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for WorkspaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl WorkspaceConfig {
    /// `host` without a scheme is assumed to be `https`.
    pub fn new(host: &str) -> Self {
        let host = host.trim().trim_end_matches('/');
        let host = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            host,
            token: None,
            timeout: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `DATABRICKS_HOST`, `DATABRICKS_TOKEN` and `GENIE_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup(HOST_VAR)
            .filter(|h| !h.trim().is_empty())
            .ok_or(ConfigError::MissingVar(HOST_VAR))?;
        let mut config = Self::new(&host);
        if let Some(token) = lookup(TOKEN_VAR).filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
