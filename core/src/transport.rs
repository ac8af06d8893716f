//! Blocking transport built on `ureq`.
//!
//! 4xx/5xx answers come back as `HttpResponse` values (ureq's
//! status-as-error behavior is disabled) so status mapping stays in the core.
//! Only connection-level failures become a `TransportError`.

use ureq::Agent;

/// Largest response body read, sized for exported space configurations.
pub const MAX_RESPONSE_BYTES: u64 = 256 * 1024 * 1024;

use crate::client::SpacesManager;
use crate::config::{ConfigError, WorkspaceConfig};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    host: String,
    token: Option<String>,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("host", &self.host)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl UreqTransport {
    pub fn new(config: &WorkspaceConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            host: config.host.clone(),
            token: config.token.clone(),
        }
    }

    fn prepare<B>(&self, mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }
}

impl Transport for UreqTransport {
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.host, request.path);
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => self.prepare(self.agent.get(&url), request).call(),
            HttpMethod::Delete => self.prepare(self.agent.delete(&url), request).call(),
            HttpMethod::Post => {
                let builder = self.prepare(self.agent.post(&url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Patch => {
                let builder = self.prepare(self.agent.patch(&url), request);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError::connection(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| TransportError {
                status: Some(status),
                message: format!("failed to read response body: {e}"),
                response: None,
            })?;

        Ok(HttpResponse { status, headers, body })
    }
}

impl SpacesManager<UreqTransport> {
    /// Manager backed by [`UreqTransport`], configured from
    /// `DATABRICKS_HOST` / `DATABRICKS_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = WorkspaceConfig::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(UreqTransport::new(config))
    }
}
