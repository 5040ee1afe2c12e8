use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

#[cfg(feature = "rest_client")]
use crate::ApiClient;
use crate::{
    CellDisplay, MAX_WINDOW_MONTHS, NodeKind, Period, PlanError, PlanSnapshot,
    PlanVsActualReport, PlanWorkspace, ReferenceMonth, TreeNode, hierarchy::ChildLoader,
    render_cell,
};

#[derive(Clone)]
pub struct AppState {
    workspace: Arc<RwLock<PlanWorkspace>>,
    /// Backend serving the lazy tree levels; the snapshot is used when absent.
    #[cfg(feature = "rest_client")]
    client: Option<ApiClient>,
}

impl AppState {
    pub fn new(workspace: PlanWorkspace) -> Self {
        Self {
            workspace: Arc::new(RwLock::new(workspace)),
            #[cfg(feature = "rest_client")]
            client: None,
        }
    }

    #[cfg(feature = "rest_client")]
    pub fn with_client(mut self, client: ApiClient) -> Self {
        self.client = Some(client);
        self
    }

    fn workspace(&self) -> Arc<RwLock<PlanWorkspace>> {
        self.workspace.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        match value {
            PlanError::InvalidData(message) | PlanError::Config(message) => {
                ApiError::Invalid(message)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        if status.is_server_error() {
            warn!(%message, "request failed");
        }
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/snapshot", get(get_snapshot).put(replace_snapshot))
        .route("/summary", get(get_summary))
        .route("/cell", get(get_cell))
        .route("/trees/projects", get(project_tree))
        .route("/trees/org", get(org_tree))
        .route("/trees/product-lines/:id/projects", get(line_projects))
        .route("/trees/sub-teams/:id/users", get(team_users))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http api listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_snapshot(State(state): State<AppState>) -> Json<PlanSnapshot> {
    let workspace = state.workspace();
    let snapshot = {
        let guard = workspace.read();
        guard.snapshot().clone()
    };
    Json(snapshot)
}

async fn replace_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<PlanSnapshot>,
) -> Result<StatusCode, ApiError> {
    let workspace = state.workspace();
    {
        let mut guard = workspace.write();
        guard.set_snapshot(snapshot)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    reference: String,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    months: Option<usize>,
}

fn parse_month(value: &str) -> Result<ReferenceMonth, ApiError> {
    value.parse::<ReferenceMonth>().map_err(ApiError::invalid)
}

async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<PlanVsActualReport>, ApiError> {
    let reference = parse_month(&query.reference)?;
    let start = match query.start.as_deref() {
        Some(start) => parse_month(start)?,
        None => ReferenceMonth::new(reference.year, 1),
    };
    if let Some(count) = query.months {
        if count == 0 || count > MAX_WINDOW_MONTHS {
            return Err(ApiError::invalid(format!(
                "months must be between 1 and {MAX_WINDOW_MONTHS}"
            )));
        }
    }
    let workspace = state.workspace();
    let report = {
        let guard = workspace.read();
        let months = match query.months {
            Some(count) => crate::reporting_window(start, count),
            None => guard.window(start),
        };
        guard.report(&months, reference)
    };
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct CellQuery {
    plan: f64,
    #[serde(default)]
    actual: f64,
    period: String,
}

async fn get_cell(Query(query): Query<CellQuery>) -> Result<Json<CellDisplay>, ApiError> {
    let period = query.period.parse::<Period>().map_err(ApiError::invalid)?;
    if !query.plan.is_finite() || !query.actual.is_finite() {
        return Err(ApiError::invalid("plan and actual must be finite numbers"));
    }
    Ok(Json(render_cell(query.plan, query.actual, period)))
}

#[derive(Debug, Default, Deserialize)]
struct TreeQuery {
    #[serde(default)]
    search: String,
}

async fn project_tree(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> Json<Vec<TreeNode>> {
    let workspace = state.workspace();
    let nodes = {
        let guard = workspace.read();
        guard.project_tree().filtered(&query.search)
    };
    Json(nodes)
}

async fn org_tree(
    State(state): State<AppState>,
    Query(query): Query<TreeQuery>,
) -> Json<Vec<TreeNode>> {
    let workspace = state.workspace();
    let nodes = {
        let guard = workspace.read();
        guard.org_tree().filtered(&query.search)
    };
    Json(nodes)
}

async fn line_projects(
    State(state): State<AppState>,
    Path(line_id): Path<i64>,
) -> Result<Json<Vec<TreeNode>>, ApiError> {
    lazy_children(&state, NodeKind::ProductLine, line_id)
        .await
        .map(Json)
}

async fn team_users(
    State(state): State<AppState>,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<TreeNode>>, ApiError> {
    lazy_children(&state, NodeKind::SubTeam, team_id)
        .await
        .map(Json)
}

/// Children of a product line or sub team, from the backend when one is attached.
async fn lazy_children(
    state: &AppState,
    kind: NodeKind,
    id: i64,
) -> Result<Vec<TreeNode>, ApiError> {
    let local = {
        let workspace = state.workspace();
        let guard = workspace.read();
        let tree = match kind {
            NodeKind::ProductLine => guard.project_tree(),
            _ => guard.org_tree(),
        };
        let node = tree
            .find(kind, id)
            .ok_or_else(|| ApiError::not_found(format!("{} {id} not found", kind.as_str())))?;
        guard.loader().load_children(node)?
    };

    Ok(remote_children(state, kind, id).await?.unwrap_or(local))
}

#[cfg(feature = "rest_client")]
async fn remote_children(
    state: &AppState,
    kind: NodeKind,
    id: i64,
) -> Result<Option<Vec<TreeNode>>, ApiError> {
    let Some(client) = &state.client else {
        return Ok(None);
    };
    let children = match kind {
        NodeKind::ProductLine => client.line_projects(id).await?,
        _ => client.team_users(id).await?,
    };
    Ok(Some(children))
}

#[cfg(not(feature = "rest_client"))]
async fn remote_children(
    _state: &AppState,
    _kind: NodeKind,
    _id: i64,
) -> Result<Option<Vec<TreeNode>>, ApiError> {
    Ok(None)
}
