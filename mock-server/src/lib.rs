use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const SPACES_PATH: &str = "/api/2.0/genie/spaces";
pub const MOCK_USER: &str = "mock-user@example.com";
const DEFAULT_PAGE_SIZE: usize = 100;
const MAX_REQUEST_BYTES: usize = 64 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub space_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub warehouse_id: String,
    pub parent_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialized_space: Option<String>,
    pub created_by: String,
    pub created_at: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSpacesResponse {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spaces: Vec<Space>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateSpace {
    pub warehouse_id: String,
    pub parent_path: String,
    pub serialized_space: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSpace {
    pub warehouse_id: Option<String>,
    pub parent_path: Option<String>,
    pub serialized_space: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateSpace {
    fn is_empty(&self) -> bool {
        self.warehouse_id.is_none()
            && self.parent_path.is_none()
            && self.serialized_space.is_none()
            && self.title.is_none()
            && self.description.is_none()
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page_size: Option<usize>,
    pub page_token: Option<String>,
}

#[derive(Deserialize)]
pub struct GetParams {
    #[serde(default)]
    pub include_serialized_space: bool,
}

/// Knobs for simulating workspace configurations.
#[derive(Clone, Copy, Debug)]
pub struct MockOptions {
    /// When false every route answers `501 Not Implemented`, like a
    /// workspace outside the Genie API preview.
    pub genie_enabled: bool,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self { genie_enabled: true }
    }
}

/// Spaces in creation order; trashed spaces are removed.
pub type Db = Arc<RwLock<Vec<Space>>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    options: MockOptions,
}

type ApiFailure = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiFailure>;

fn failure(status: StatusCode, error_code: &str, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ErrorBody {
            error_code: error_code.to_string(),
            message: message.into(),
        }),
    )
}

fn not_found(space_id: &str) -> ApiFailure {
    failure(
        StatusCode::NOT_FOUND,
        "RESOURCE_DOES_NOT_EXIST",
        format!("Space {space_id} does not exist."),
    )
}

impl AppState {
    fn ensure_enabled(&self) -> Result<(), ApiFailure> {
        if self.options.genie_enabled {
            Ok(())
        } else {
            Err(failure(
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "Genie API is not enabled for this workspace.",
            ))
        }
    }
}

pub fn app() -> Router {
    app_with(MockOptions::default())
}

pub fn app_with(options: MockOptions) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        options,
    };
    Router::new()
        .route(SPACES_PATH, get(list_spaces).post(create_space))
        .route(
            &format!("{SPACES_PATH}/{{space_id}}"),
            get(get_space).patch(update_space).delete(trash_space),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockOptions::default()).await
}

pub async fn run_with(listener: TcpListener, options: MockOptions) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(options)).await
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

async fn list_spaces(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<ListSpacesResponse> {
    state.ensure_enabled()?;
    let offset = match params.page_token.as_deref() {
        None | Some("") => 0,
        Some(token) => token.parse::<usize>().map_err(|_| {
            failure(
                StatusCode::BAD_REQUEST,
                "INVALID_PARAMETER_VALUE",
                format!("Invalid page token: {token}"),
            )
        })?,
    };
    let page_size = params.page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);

    let spaces = state.db.read().await;
    let end = offset.saturating_add(page_size).min(spaces.len());
    let page: Vec<Space> = spaces
        .get(offset..end)
        .unwrap_or_default()
        .iter()
        .map(|s| Space {
            serialized_space: None,
            ..s.clone()
        })
        .collect();
    let next_page_token = (end < spaces.len()).then(|| end.to_string());
    tracing::debug!(offset, returned = page.len(), "listed spaces");
    Ok(Json(ListSpacesResponse {
        spaces: page,
        next_page_token,
    }))
}

async fn create_space(
    State(state): State<AppState>,
    Json(input): Json<CreateSpace>,
) -> ApiResult<Space> {
    state.ensure_enabled()?;
    if input.warehouse_id.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "INVALID_PARAMETER_VALUE",
            "warehouse_id is required",
        ));
    }
    let space = Space {
        space_id: Uuid::new_v4().simple().to_string(),
        title: input.title,
        description: input.description,
        warehouse_id: input.warehouse_id,
        parent_path: input.parent_path,
        serialized_space: input.serialized_space,
        created_by: MOCK_USER.to_string(),
        created_at: now_millis(),
    };
    state.db.write().await.push(space.clone());
    tracing::debug!(space_id = %space.space_id, "created space");
    Ok(Json(Space {
        serialized_space: None,
        ..space
    }))
}

async fn get_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    Query(params): Query<GetParams>,
) -> ApiResult<Space> {
    state.ensure_enabled()?;
    let spaces = state.db.read().await;
    let space = spaces
        .iter()
        .find(|s| s.space_id == space_id)
        .cloned()
        .ok_or_else(|| not_found(&space_id))?;
    if params.include_serialized_space {
        Ok(Json(space))
    } else {
        Ok(Json(Space {
            serialized_space: None,
            ..space
        }))
    }
}

async fn update_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
    Json(input): Json<UpdateSpace>,
) -> ApiResult<Space> {
    state.ensure_enabled()?;
    if input.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "INVALID_PARAMETER_VALUE",
            "At least one field must be updated",
        ));
    }
    let mut spaces = state.db.write().await;
    let space = spaces
        .iter_mut()
        .find(|s| s.space_id == space_id)
        .ok_or_else(|| not_found(&space_id))?;
    if let Some(warehouse_id) = input.warehouse_id {
        space.warehouse_id = warehouse_id;
    }
    if let Some(parent_path) = input.parent_path {
        space.parent_path = parent_path;
    }
    if let Some(serialized_space) = input.serialized_space {
        space.serialized_space = Some(serialized_space);
    }
    if let Some(title) = input.title {
        space.title = Some(title);
    }
    if let Some(description) = input.description {
        space.description = Some(description);
    }
    Ok(Json(Space {
        serialized_space: None,
        ..space.clone()
    }))
}

async fn trash_space(
    State(state): State<AppState>,
    Path(space_id): Path<String>,
) -> ApiResult<serde_json::Value> {
    state.ensure_enabled()?;
    let mut spaces = state.db.write().await;
    let index = spaces
        .iter()
        .position(|s| s.space_id == space_id)
        .ok_or_else(|| not_found(&space_id))?;
    spaces.remove(index);
    tracing::debug!(%space_id, "trashed space");
    Ok(Json(serde_json::json!({})))
}
