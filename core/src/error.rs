//! Error types for the Genie spaces client.
//!
//! # Design
//! Every failure reported by the transport or the remote service collapses
//! into one [`ApiError`] carrying the status code, a message and the raw
//! payload when one exists. Status `0` means the transport had no status to
//! report. `501` is rewritten into [`NOT_ENABLED_MESSAGE`] because the remote
//! service answers that way for workspaces outside the private preview.
//!
//! Local failures never carry a status code and live in their own
//! [`SpacesError`] variants.

use crate::http::{HttpResponse, TransportError};

/// Message used for every `501 Not Implemented` answer.
pub const NOT_ENABLED_MESSAGE: &str =
    "This API is not yet supported. Your workspace may not be enabled for the Genie API private preview.";

/// A failed call against the Genie API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Genie Space Error ({status_code}): {message}")]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    pub response: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status_code: u16, message: impl Into<String>, response: Option<serde_json::Value>) -> Self {
        let message = if status_code == 501 {
            NOT_ENABLED_MESSAGE.to_string()
        } else {
            message.into()
        };
        Self {
            status_code,
            message,
            response,
        }
    }

    /// Map a non-2xx response. The message prefers the `message` field of a
    /// JSON error body, then the raw body.
    pub fn from_response(response: &HttpResponse) -> Self {
        let payload: Option<serde_json::Value> = serde_json::from_str(&response.body).ok();
        let message = payload
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .or_else(|| {
                let raw = response.body.trim();
                (!raw.is_empty()).then(|| raw.to_string())
            })
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        Self::new(response.status, message, payload)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::new(err.status.unwrap_or(0), err.message, err.response)
    }
}

/// Errors returned by `SpacesClient` and `SpacesManager`.
#[derive(Debug, thiserror::Error)]
pub enum SpacesError {
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body did not decode into the expected record.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl SpacesError {
    /// Status code of an API failure; `None` for local errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SpacesError::Api(err) => Some(err.status_code),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            SpacesError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for SpacesError {
    fn from(err: TransportError) -> Self {
        SpacesError::Api(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn display_includes_status_code() {
        let err = ApiError::new(404, "Not found", Some(serde_json::json!({"error": "details"})));
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "Not found");
        assert_eq!(err.response, Some(serde_json::json!({"error": "details"})));
        assert_eq!(err.to_string(), "Genie Space Error (404): Not found");
    }

    #[test]
    fn status_501_overrides_message() {
        let err = ApiError::new(501, "Not supported", None);
        assert_eq!(err.status_code, 501);
        assert!(err.message.to_lowercase().contains("not yet supported"));
        assert!(err.message.contains("may not be enabled"));
    }

    #[test]
    fn transport_error_without_status_maps_to_zero() {
        let err: ApiError = TransportError::connection("connection refused").into();
        assert_eq!(err.status_code, 0);
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn transport_error_message_is_kept_verbatim() {
        let err: ApiError = TransportError::with_status(404, "boom").into();
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn from_response_prefers_json_message() {
        let err = ApiError::from_response(&response(
            404,
            r#"{"error_code":"RESOURCE_DOES_NOT_EXIST","message":"Space abc does not exist."}"#,
        ));
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "Space abc does not exist.");
        assert_eq!(err.response.unwrap()["error_code"], "RESOURCE_DOES_NOT_EXIST");
    }

    #[test]
    fn from_response_falls_back_to_raw_body() {
        let err = ApiError::from_response(&response(502, "bad gateway"));
        assert_eq!(err.message, "bad gateway");
        assert!(err.response.is_none());

        let err = ApiError::from_response(&response(500, ""));
        assert_eq!(err.message, "HTTP 500");
    }

    #[test]
    fn validation_error_has_no_status() {
        let err = SpacesError::Validation("nope".to_string());
        assert_eq!(err.status_code(), None);
        assert!(err.as_api().is_none());
    }
}
