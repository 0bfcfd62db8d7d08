use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use pixel_grid::{ExportOptions, ExportScale, SessionError};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::SessionId;
use crate::server::AppState;
use crate::services::{ExportError, SessionStore};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// Pixels per cell: 1, 2, 4, 8 or 16 (default: 1)
    pub scale: Option<u32>,
    /// Draw grid lines (default: the session's grid overlay preference)
    pub grid: Option<bool>,
    /// Embed palette and color usage as PNG text chunks
    #[serde(default)]
    pub metadata: bool,
}

/// Export the working grid as PNG
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/export.png",
    responses(
        (status = 200, description = "Indexed PNG image", content_type = "image/png"),
        (status = 400, description = "Invalid scale"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session has no grid"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ExportParams,
    ),
    tag = "Export"
)]
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let id = SessionId::new(id);
    let scale = ExportScale::new(params.scale.unwrap_or(1)).map_err(ExportError::from)?;

    let session = state.sessions.require(&id).await?;
    let (grid, show_grid) = {
        let entry = session.lock().await;
        let grid = entry.editor.grid().cloned().ok_or(SessionError::NoGrid)?;
        let show_grid = params
            .grid
            .unwrap_or(entry.editor.preferences().show_grid);
        (grid, show_grid)
    };

    let options = ExportOptions::new(scale)
        .show_grid(show_grid)
        .include_color_info(params.metadata);
    let filename = format!(
        "pixel-art-{}x{}@{}x.png",
        grid.width(),
        grid.height(),
        scale.get()
    );

    let exporter = state.exporter;
    let png_bytes = tokio::task::spawn_blocking(move || exporter.export(&grid, &options))
        .await
        .map_err(|e| ApiError::Internal(format!("export task failed: {e}")))??;

    tracing::info!(
        session = %id,
        scale = scale.get(),
        show_grid,
        metadata = params.metadata,
        bytes = png_bytes.len(),
        "Grid exported"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png_bytes.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Bytes::from(png_bytes),
    )
        .into_response())
}
