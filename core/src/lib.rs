//! Administrative client for Databricks Genie spaces.
//!
//! # Overview
//! Lists, creates, reads, updates and trashes Genie spaces through
//! `/api/2.0/genie/spaces`. HTTP, authentication and retries belong to a
//! caller-supplied [`Transport`]; this crate builds the requests, decodes the
//! responses into typed records and turns every failure into one
//! [`ApiError`].
//!
//! # Design
//! - `SpacesClient` is stateless: `build_*` produces requests, `parse_*`
//!   consumes responses, so the I/O boundary is explicit.
//! - `SpacesManager` owns a transport and runs one request per operation.
//! - The `spans` feature wraps each operation in a `tracing` span.
//! - The `ureq` feature ships [`UreqTransport`] configured from
//!   [`WorkspaceConfig`].

mod telemetry;

pub mod client;
pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::{SpacesClient, SpacesManager, API_PREFIX};
pub use config::{ConfigError, WorkspaceConfig};
pub use error::{ApiError, SpacesError, NOT_ENABLED_MESSAGE};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{CreateSpace, ListSpaces, ListSpacesResponse, Space, TrashSpaceResponse, UpdateSpace};

