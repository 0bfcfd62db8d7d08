//! Grid editing and undo/redo routes.
//!
//! Edits change the working grid only. Pass `"commit": true` (or call the
//! commit route) to record the result in the undo history.

use axum::extract::{Path, State};
use axum::response::Json;
use pixel_grid::CellUpdate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::sessions::SessionView;
use crate::error::ApiError;
use crate::models::SessionId;
use crate::server::AppState;
use crate::services::{SessionEntry, SessionStore};

/// Request body for batch cell updates
#[derive(Debug, Deserialize, ToSchema)]
pub struct PixelsRequest {
    /// Cells to set, as `{x, y, colorIndex}`; all or none are applied
    #[schema(value_type = Vec<Object>)]
    pub updates: Vec<CellUpdate>,
    /// Commit the result to the undo history
    #[serde(default)]
    pub commit: bool,
}

/// Request body for flood fill
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FillRequest {
    pub x: u32,
    pub y: u32,
    /// Palette index to fill with
    pub color_index: usize,
    #[serde(default)]
    pub commit: bool,
}

/// Request body for applying the selected tool at a cell
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToolRequest {
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub commit: bool,
}

/// Result of an edit
#[derive(Debug, Serialize, ToSchema)]
pub struct EditResponse {
    /// Cells whose color changed
    pub changed: usize,
    /// Whether the result was committed
    pub committed: bool,
    pub session: SessionView,
}

/// Result of a history step
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Whether the step did anything
    pub applied: bool,
    pub session: SessionView,
}

/// Run an edit against a session and optionally commit it
async fn edit<F>(
    state: &AppState,
    id: String,
    commit: bool,
    op: F,
) -> Result<Json<EditResponse>, ApiError>
where
    F: FnOnce(&mut SessionEntry) -> Result<usize, pixel_grid::SessionError>,
{
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;
    let mut entry = session.lock().await;

    let changed = op(&mut *entry)?;
    if commit {
        entry.editor.commit()?;
    }

    tracing::debug!(session = %id, changed, commit, "Grid edited");
    Ok(Json(EditResponse {
        changed,
        committed: commit,
        session: SessionView::new(&id, &entry),
    }))
}

/// Run a history operation against a session
async fn step<F>(state: &AppState, id: String, op: F) -> Result<Json<HistoryResponse>, ApiError>
where
    F: FnOnce(&mut SessionEntry) -> Result<bool, pixel_grid::SessionError>,
{
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;
    let mut entry = session.lock().await;

    let applied = op(&mut *entry)?;
    tracing::debug!(
        session = %id,
        applied,
        cursor = ?entry.editor.history().cursor(),
        "History step"
    );
    Ok(Json(HistoryResponse {
        applied,
        session: SessionView::new(&id, &entry),
    }))
}

/// Set individual cells
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/pixels",
    request_body = PixelsRequest,
    responses(
        (status = 200, description = "Cells updated", body = EditResponse),
        (status = 400, description = "Cell out of bounds or invalid color index"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Editing"
)]
pub async fn handle_set_pixels(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PixelsRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    edit(&state, id, request.commit, |entry| {
        entry.editor.set_cells(&request.updates)
    })
    .await
}

/// Flood fill the 4-connected region around a cell
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/fill",
    request_body = FillRequest,
    responses(
        (status = 200, description = "Region filled", body = EditResponse),
        (status = 400, description = "Cell out of bounds or invalid color index"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Editing"
)]
pub async fn handle_fill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<FillRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    edit(&state, id, request.commit, |entry| {
        entry.editor.fill(request.x, request.y, request.color_index)
    })
    .await
}

/// Apply the selected tool (pixel brush, fill or eyedropper) at a cell
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/tool",
    request_body = ToolRequest,
    responses(
        (status = 200, description = "Tool applied", body = EditResponse),
        (status = 400, description = "Cell out of bounds or invalid color index"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Editing"
)]
pub async fn handle_apply_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<EditResponse>, ApiError> {
    edit(&state, id, request.commit, |entry| {
        entry.editor.apply_tool(request.x, request.y)
    })
    .await
}

/// Commit the working grid to the undo history
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/commit",
    responses(
        (status = 200, description = "Committed", body = HistoryResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "History"
)]
pub async fn handle_commit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    step(&state, id, |entry| entry.editor.commit().map(|_| true)).await
}

/// Step back one snapshot
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/undo",
    responses(
        (status = 200, description = "applied is false at the oldest snapshot", body = HistoryResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "History"
)]
pub async fn handle_undo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    step(&state, id, |entry| Ok(entry.editor.undo())).await
}

/// Step forward one snapshot
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/redo",
    responses(
        (status = 200, description = "applied is false at the newest snapshot", body = HistoryResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "History"
)]
pub async fn handle_redo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    step(&state, id, |entry| Ok(entry.editor.redo())).await
}

/// Discard uncommitted edits
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/revert",
    responses(
        (status = 200, description = "Working grid restored from the active snapshot", body = HistoryResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "History"
)]
pub async fn handle_revert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    step(&state, id, |entry| Ok(entry.editor.revert())).await
}

/// Drop all undo snapshots, keeping the working grid
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/history",
    responses(
        (status = 200, description = "History cleared", body = HistoryResponse),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "History"
)]
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    step(&state, id, |entry| {
        entry.editor.clear_history();
        Ok(true)
    })
    .await
}
