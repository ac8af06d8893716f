//! Typed records for the Genie spaces API.
//!
//! # Design
//! Responses decode into explicit records. Fields the client does not know
//! about are kept in `Space::extra` so newer server versions decode cleanly
//! and re-serialize without loss.
//!
//! Request payloads follow one inclusion rule: an optional string is sent
//! only when it is present and non-empty. An explicit empty title therefore
//! cannot be sent.

use serde::{Deserialize, Serialize};

/// Response of the trash endpoint, usually empty.
pub type TrashSpaceResponse = serde_json::Map<String, serde_json::Value>;

/// A Genie space as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    /// Empty when the server omitted it.
    #[serde(default)]
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    /// Exported configuration blob. Only present when requested with
    /// `include_serialized_space`; never parsed by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serialized_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Server-assigned creation time, kept in whatever JSON form the server uses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of spaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListSpacesResponse {
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Query parameters for listing spaces. A zero page size and an empty token
/// are treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListSpaces {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

impl ListSpaces {
    pub fn new(page_size: Option<u32>, page_token: Option<&str>) -> Self {
        Self {
            page_size,
            page_token: page_token.map(str::to_string),
        }
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            query.push(("page_size".to_string(), size.to_string()));
        }
        if let Some(token) = self.page_token.as_deref().filter(|t| !t.is_empty()) {
            query.push(("page_token".to_string(), token.to_string()));
        }
        query
    }
}

/// Request payload for creating a space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSpace {
    pub warehouse_id: String,
    pub parent_path: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub serialized_space: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl CreateSpace {
    pub fn new(warehouse_id: impl Into<String>, parent_path: impl Into<String>) -> Self {
        Self {
            warehouse_id: warehouse_id.into(),
            parent_path: parent_path.into(),
            serialized_space: None,
            title: None,
            description: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn serialized_space(mut self, serialized_space: impl Into<String>) -> Self {
        self.serialized_space = Some(serialized_space.into());
        self
    }

    /// Payload recreating an exported space under `parent_path`.
    ///
    /// Returns `None` unless `space` was fetched with its serialized
    /// configuration and carries a warehouse binding.
    pub fn from_export(space: &Space, parent_path: impl Into<String>) -> Option<Self> {
        let serialized = space.serialized_space.as_deref().filter(|s| !s.is_empty())?;
        let warehouse = space.warehouse_id.as_deref().filter(|w| !w.is_empty())?;
        Some(Self {
            warehouse_id: warehouse.to_string(),
            parent_path: parent_path.into(),
            serialized_space: Some(serialized.to_string()),
            title: space.title.clone(),
            description: space.description.clone(),
        })
    }
}

/// Partial update payload. Only non-empty fields are sent; omitted fields
/// are left untouched on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSpace {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub warehouse_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub parent_path: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub serialized_space: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: Option<String>,
}

impl UpdateSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warehouse_id(mut self, warehouse_id: impl Into<String>) -> Self {
        self.warehouse_id = Some(warehouse_id.into());
        self
    }

    pub fn parent_path(mut self, parent_path: impl Into<String>) -> Self {
        self.parent_path = Some(parent_path.into());
        self
    }

    pub fn serialized_space(mut self, serialized_space: impl Into<String>) -> Self {
        self.serialized_space = Some(serialized_space.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names of the fields that would be sent, in wire order.
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("warehouse_id", &self.warehouse_id),
            ("parent_path", &self.parent_path),
            ("serialized_space", &self.serialized_space),
            ("title", &self.title),
            ("description", &self.description),
        ]
        .into_iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_space_omits_missing_fields() {
        let input = CreateSpace::new("abc123", "/Workspace/Users/test").title("New Space");
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "warehouse_id": "abc123",
                "parent_path": "/Workspace/Users/test",
                "title": "New Space"
            })
        );
    }

    #[test]
    fn create_space_drops_empty_strings() {
        let input = CreateSpace::new("abc123", "/Workspace").title("").description("");
        let body = serde_json::to_value(&input).unwrap();
        assert!(body.get("title").is_none());
        assert!(body.get("description").is_none());
    }

    #[test]
    fn update_space_field_names_skip_blank() {
        let input = UpdateSpace::new().title("T").description("").warehouse_id("wh");
        assert_eq!(input.field_names(), vec!["warehouse_id", "title"]);
        assert!(!input.is_empty());
        assert!(UpdateSpace::new().title("").is_empty());
    }

    #[test]
    fn list_query_skips_zero_and_empty() {
        assert!(ListSpaces::new(Some(0), Some("")).to_query().is_empty());
        assert_eq!(
            ListSpaces::new(Some(25), Some("tok")).to_query(),
            vec![
                ("page_size".to_string(), "25".to_string()),
                ("page_token".to_string(), "tok".to_string())
            ]
        );
    }

    #[test]
    fn space_keeps_unknown_fields() {
        let raw = r#"{"space_id":"1","title":"T","etag":"abc","created_at":1700000000000}"#;
        let space: Space = serde_json::from_str(raw).unwrap();
        assert_eq!(space.extra["etag"], "abc");
        assert_eq!(space.created_at, Some(serde_json::json!(1700000000000u64)));
        let back = serde_json::to_value(&space).unwrap();
        assert_eq!(back, serde_json::from_str::<serde_json::Value>(raw).unwrap());
    }

    #[test]
    fn list_response_defaults_missing_spaces() {
        let page: ListSpacesResponse = serde_json::from_str("{}").unwrap();
        assert!(page.spaces.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn from_export_requires_blob_and_warehouse() {
        let mut space: Space = serde_json::from_str(
            r#"{"space_id":"1","title":"Sales","warehouse_id":"wh","serialized_space":"{\"version\":1}"}"#,
        )
        .unwrap();
        let input = CreateSpace::from_export(&space, "/Workspace/Shared").unwrap();
        assert_eq!(input.warehouse_id, "wh");
        assert_eq!(input.parent_path, "/Workspace/Shared");
        assert_eq!(input.serialized_space.as_deref(), Some("{\"version\":1}"));
        assert_eq!(input.title.as_deref(), Some("Sales"));

        space.serialized_space = None;
        assert!(CreateSpace::from_export(&space, "/Workspace/Shared").is_none());
    }
}
