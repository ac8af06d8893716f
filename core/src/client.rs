//! Request builder, response parser and the transport-backed façade for the
//! Genie spaces API.
//!
//! # Design
//! `SpacesClient` holds only the API base path and carries no mutable state.
//! Each operation is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`, so a host
//! that performs its own I/O can use it directly.
//!
//! `SpacesManager` pairs a `SpacesClient` with a caller-owned [`Transport`]
//! and runs build, perform and parse as one call. Every operation sends at
//! most one request. Nothing is retried or cached.

use tracing::{debug, warn};

use crate::error::{ApiError, SpacesError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::telemetry::record_span_field;
use crate::types::{CreateSpace, ListSpaces, ListSpacesResponse, Space, TrashSpaceResponse, UpdateSpace};

/// Path prefix of every Genie endpoint.
pub const API_PREFIX: &str = "/api/2.0/genie";

const EMPTY_UPDATE: &str = "At least one field must be provided to update";

/// Synchronous, stateless request builder for the Genie spaces API.
#[derive(Debug, Clone)]
pub struct SpacesClient {
    base_path: String,
}

impl Default for SpacesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SpacesClient {
    pub fn new() -> Self {
        Self::with_base_path(API_PREFIX)
    }

    /// Use a different path prefix, e.g. behind a proxy that rewrites paths.
    pub fn with_base_path(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn build_list_spaces(&self, params: &ListSpaces) -> HttpRequest {
        self.request(HttpMethod::Get, "spaces", params.to_query(), None)
    }

    pub fn build_create_space(&self, input: &CreateSpace) -> Result<HttpRequest, SpacesError> {
        let body = to_body(input)?;
        Ok(self.request(HttpMethod::Post, "spaces", Vec::new(), Some(body)))
    }

    pub fn build_get_space(&self, space_id: &str, include_serialized_space: bool) -> HttpRequest {
        let query = if include_serialized_space {
            vec![("include_serialized_space".to_string(), "true".to_string())]
        } else {
            Vec::new()
        };
        self.request(HttpMethod::Get, &format!("spaces/{space_id}"), query, None)
    }

    /// Fails with `SpacesError::Validation` when `input` carries no field.
    pub fn build_update_space(&self, space_id: &str, input: &UpdateSpace) -> Result<HttpRequest, SpacesError> {
        if input.is_empty() {
            return Err(SpacesError::Validation(EMPTY_UPDATE.to_string()));
        }
        let body = to_body(input)?;
        Ok(self.request(
            HttpMethod::Patch,
            &format!("spaces/{space_id}"),
            Vec::new(),
            Some(body),
        ))
    }

    pub fn build_trash_space(&self, space_id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("spaces/{space_id}"), Vec::new(), None)
    }

    pub fn parse_list_spaces(&self, response: HttpResponse) -> Result<ListSpacesResponse, SpacesError> {
        decode(&response)
    }

    /// Parse the space returned by create, get and update.
    pub fn parse_space(&self, response: HttpResponse) -> Result<Space, SpacesError> {
        decode(&response)
    }

    pub fn parse_trash_space(&self, response: HttpResponse) -> Result<TrashSpaceResponse, SpacesError> {
        decode(&response)
    }

    fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}/{}", self.base_path, endpoint.trim_start_matches('/')),
            query,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

fn to_body<T: serde::Serialize>(input: &T) -> Result<String, SpacesError> {
    serde_json::to_string(input).map_err(|e| SpacesError::Serialization(e.to_string()))
}

/// Map non-2xx statuses to `ApiError`, then decode the body. An empty or
/// `null` body decodes as `{}`.
fn decode<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, SpacesError> {
    if !response.is_success() {
        return Err(ApiError::from_response(response).into());
    }
    let body = response.body.trim();
    let body = if body.is_empty() || body == "null" { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| SpacesError::Deserialization(e.to_string()))
}

/// Administrative façade over a caller-owned, already authenticated transport.
///
/// ```no_run
/// # fn demo<T: genie_spaces::Transport>(transport: T) -> Result<(), genie_spaces::SpacesError> {
/// use genie_spaces::{SpacesManager, UpdateSpace};
///
/// let manager = SpacesManager::new(transport);
/// for space in manager.list_spaces(None, None)?.spaces {
///     manager.update_space(&space.space_id, &UpdateSpace::new().title("Renamed"))?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SpacesManager<T> {
    client: SpacesClient,
    transport: T,
}

impl<T: Transport> SpacesManager<T> {
    pub fn new(transport: T) -> Self {
        Self::with_client(SpacesClient::new(), transport)
    }

    pub fn with_client(client: SpacesClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &SpacesClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// List one page of spaces. Follow `next_page_token` with another call
    /// to read further pages.
    #[cfg_attr(
        feature = "spans",
        tracing::instrument(
            name = "list_spaces",
            skip_all,
            fields(page_size = ?page_size, num_spaces = tracing::field::Empty)
        )
    )]
    pub fn list_spaces(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ListSpacesResponse, SpacesError> {
        let request = self.client.build_list_spaces(&ListSpaces::new(page_size, page_token));
        let page = self.client.parse_list_spaces(self.execute(&request)?)?;
        record_span_field!("num_spaces", page.spaces.len());
        Ok(page)
    }

    #[cfg_attr(
        feature = "spans",
        tracing::instrument(
            name = "create_space",
            skip_all,
            fields(
                warehouse_id = %input.warehouse_id,
                title = input.title.as_deref().unwrap_or(""),
                space_id = tracing::field::Empty
            )
        )
    )]
    pub fn create_space(&self, input: &CreateSpace) -> Result<Space, SpacesError> {
        let request = self.client.build_create_space(input)?;
        let space = self.client.parse_space(self.execute(&request)?)?;
        record_span_field!("space_id", space.space_id.as_str());
        Ok(space)
    }

    /// Fetch a space. The serialized configuration is only returned when
    /// `include_serialized_space` is set.
    #[cfg_attr(
        feature = "spans",
        tracing::instrument(name = "get_space", skip_all, fields(space_id = %space_id, include_serialized_space = include_serialized_space))
    )]
    pub fn get_space(&self, space_id: &str, include_serialized_space: bool) -> Result<Space, SpacesError> {
        let request = self.client.build_get_space(space_id, include_serialized_space);
        self.client.parse_space(self.execute(&request)?)
    }

    /// Partially update a space. An update with no non-empty field is
    /// rejected before anything is sent.
    #[cfg_attr(
        feature = "spans",
        tracing::instrument(
            name = "update_space",
            skip_all,
            fields(space_id = %space_id, fields_updated = ?input.field_names())
        )
    )]
    pub fn update_space(&self, space_id: &str, input: &UpdateSpace) -> Result<Space, SpacesError> {
        let request = self.client.build_update_space(space_id, input)?;
        self.client.parse_space(self.execute(&request)?)
    }

    /// Move a space to the trash. Recovery depends on the workspace's
    /// retention settings.
    #[cfg_attr(
        feature = "spans",
        tracing::instrument(name = "trash_space", skip_all, fields(space_id = %space_id))
    )]
    pub fn trash_space(&self, space_id: &str) -> Result<TrashSpaceResponse, SpacesError> {
        let request = self.client.build_trash_space(space_id);
        self.client.parse_trash_space(self.execute(&request)?)
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SpacesError> {
        debug!(method = %request.method, path = %request.path, "sending genie request");
        match self.transport.perform(request) {
            Ok(response) => {
                if !response.is_success() {
                    warn!(status_code = response.status, path = %request.path, "genie request failed");
                }
                Ok(response)
            }
            Err(err) => {
                let err = ApiError::from(err);
                warn!(status_code = err.status_code, path = %request.path, "genie transport failed");
                Err(err.into())
            }
        }
    }
}
