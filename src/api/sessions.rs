use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use pixel_grid::{BrushTool, Config, EditorMode, Grid, Preferences};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::{Project, SessionId};
use crate::server::AppState;
use crate::services::{source, SessionEntry, SessionStore};

/// Response from session creation
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionCreated {
    /// Session identifier used in all other session routes
    pub id: String,
}

/// Position in the undo history
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryView {
    /// Index of the active snapshot, absent when the history is empty
    pub cursor: Option<usize>,
    /// Stored snapshots
    pub len: usize,
    /// Maximum snapshots kept
    pub limit: usize,
}

/// Snapshot of an editor session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    /// Working grid, absent until the first conversion
    #[schema(value_type = Option<Object>)]
    pub grid: Option<Grid>,
    pub history: HistoryView,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Working grid has edits that are not committed
    pub dirty: bool,
    /// Conversion the session is waiting for
    pub pending_request: Option<String>,
    /// Last conversion error
    pub error: Option<String>,
    #[schema(value_type = Object)]
    pub preferences: Preferences,
}

impl SessionView {
    pub fn new(id: &SessionId, entry: &SessionEntry) -> Self {
        let editor = &entry.editor;
        Self {
            id: id.to_string(),
            grid: editor.grid().cloned(),
            history: HistoryView {
                cursor: editor.history().cursor(),
                len: editor.history().len(),
                limit: editor.history().limit(),
            },
            can_undo: editor.can_undo(),
            can_redo: editor.can_redo(),
            dirty: editor.is_dirty(),
            pending_request: editor.pending_request().map(|id| id.to_string()),
            error: editor.error().map(str::to_string),
            preferences: *editor.preferences(),
        }
    }
}

/// Create an editor session
#[utoipa::path(
    post,
    path = "/api/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionCreated),
    ),
    tag = "Session"
)]
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.sessions.create().await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated { id: id.to_string() }),
    ))
}

/// Get the state of an editor session
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Session"
)]
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;
    let entry = session.lock().await;
    Ok(Json(SessionView::new(&id, &entry)))
}

/// Delete an editor session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Session"
)]
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&SessionId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

/// Request body for a preferences update; fields left out are unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    /// "view" or "edit"
    #[schema(value_type = Option<String>)]
    pub mode: Option<EditorMode>,
    /// "pixel", "fill" or "eyedropper"
    #[schema(value_type = Option<String>)]
    pub tool: Option<BrushTool>,
    /// Palette index painted by the pixel and fill tools
    pub selected_color: Option<usize>,
    /// Brush edge length, 1 to 3
    pub brush_size: Option<u8>,
    /// Draw grid lines in views and exports
    pub show_grid: Option<bool>,
}

impl PreferencesUpdate {
    pub fn apply(&self, current: Preferences) -> Preferences {
        Preferences {
            mode: self.mode.unwrap_or(current.mode),
            tool: self.tool.unwrap_or(current.tool),
            selected_color: self.selected_color.unwrap_or(current.selected_color),
            brush_size: self.brush_size.unwrap_or(current.brush_size),
            show_grid: self.show_grid.unwrap_or(current.show_grid),
        }
    }
}

/// Update the editor preferences
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/preferences",
    request_body = PreferencesUpdate,
    responses(
        (status = 200, description = "Updated session", body = SessionView),
        (status = 400, description = "Invalid preferences"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session ID")),
    tag = "Session"
)]
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;
    let mut entry = session.lock().await;
    let preferences = update.apply(*entry.editor.preferences());
    entry.editor.set_preferences(preferences)?;

    tracing::debug!(
        session = %id,
        mode = ?preferences.mode,
        tool = %preferences.tool,
        brush_size = preferences.brush_size,
        "Preferences updated"
    );
    Ok(Json(SessionView::new(&id, &entry)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProjectParams {
    /// Project name (default: "Untitled")
    pub name: Option<String>,
    /// Embed the source upload as a data URL
    #[serde(default)]
    pub include_source: bool,
}

/// Snapshot the session into a project
///
/// The project is built from the working grid and returned; the server
/// does not keep it.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/project",
    responses(
        (status = 200, description = "Project snapshot", body = Project),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ProjectParams,
    ),
    tag = "Session"
)]
pub async fn handle_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ProjectParams>,
) -> Result<Json<Project>, ApiError> {
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;

    let (grid, config, source) = {
        let entry = session.lock().await;
        let grid = entry
            .editor
            .grid()
            .cloned()
            .ok_or(pixel_grid::SessionError::NoGrid)?;
        let config = entry.config.unwrap_or_else(|| {
            Config::new(grid.width(), grid.height(), grid.palette().len() as u32)
        });
        (grid, config, entry.source.clone())
    };

    let exporter = state.exporter;
    let thumb_grid = grid.clone();
    let thumbnail = tokio::task::spawn_blocking(move || exporter.thumbnail(&thumb_grid))
        .await
        .map_err(|e| ApiError::Internal(format!("thumbnail task failed: {e}")))??;

    let name = params.name.unwrap_or_else(|| "Untitled".to_string());
    let mut project = Project::new(name, grid, config).with_thumbnail(thumbnail);
    if params.include_source {
        if let Some(source) = source {
            project = project.with_source_image(source::data_url(source.format, &source.bytes));
        }
    }

    tracing::info!(session = %id, project = %project.id, "Project snapshot created");
    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_update_keeps_missing_fields() {
        let current = Preferences {
            brush_size: 2,
            show_grid: false,
            ..Preferences::default()
        };
        let update = PreferencesUpdate {
            tool: Some(BrushTool::Fill),
            ..PreferencesUpdate::default()
        };
        let merged = update.apply(current);
        assert_eq!(merged.tool, BrushTool::Fill);
        assert_eq!(merged.brush_size, 2);
        assert!(!merged.show_grid);
    }

    #[test]
    fn test_preferences_update_from_json() {
        let update: PreferencesUpdate =
            serde_json::from_str(r#"{"mode":"edit","brushSize":3}"#).unwrap();
        let merged = update.apply(Preferences::default());
        assert_eq!(merged.mode, EditorMode::Edit);
        assert_eq!(merged.brush_size, 3);
        assert_eq!(merged.tool, BrushTool::Pixel);
    }

    #[test]
    fn test_session_view_of_empty_session() {
        let entry = SessionEntry::new(5);
        let view = SessionView::new(&SessionId::new("abc"), &entry);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "abc");
        assert!(json["grid"].is_null());
        assert_eq!(json["history"]["limit"], 5);
        assert_eq!(json["canUndo"], false);
        assert_eq!(json["dirty"], false);
        assert_eq!(json["preferences"]["brushSize"], 1);
    }
}
