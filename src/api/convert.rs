use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pixel_grid::{Completion, Config, ConvertError, RequestKind};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::SessionId;
use crate::server::AppState;
use crate::services::{SessionStore, SourceError, StoredSource};

/// Conversion settings; anything left out comes from the configured defaults
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConvertParams {
    /// Grid width in cells (1-500)
    pub width: Option<u32>,
    /// Grid height in cells (1-500)
    pub height: Option<u32>,
    /// Palette size (2-14)
    pub color_count: Option<u32>,
    /// Apply Floyd-Steinberg dithering
    pub dithering: Option<bool>,
    /// "resample", "quantize" or "generate-grid" (default)
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<RequestKind>,
}

impl ConvertParams {
    pub fn resolve(&self, defaults: Config) -> Config {
        Config {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            color_count: self.color_count.unwrap_or(defaults.color_count),
            dithering: self.dithering.unwrap_or(defaults.dithering),
        }
    }
}

/// Convert an uploaded image
///
/// The request body is the raw image (JPEG, PNG or WebP). Each call
/// supersedes any conversion still running for the session; a call that
/// was superseded before it finished gets 409 and changes nothing.
/// A `generate-grid` result replaces the working grid and is committed
/// to the undo history.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/convert",
    request_body(content = Vec<u8>, content_type = "application/octet-stream", description = "Image file"),
    responses(
        (status = 200, description = "Conversion response (type, requestId, result)"),
        (status = 400, description = "Image could not be decoded"),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Superseded by a newer conversion"),
        (status = 413, description = "Upload too large"),
        (status = 415, description = "Unsupported image format"),
        (status = 422, description = "Invalid settings or failed conversion"),
    ),
    params(
        ("id" = String, Path, description = "Session ID"),
        ConvertParams,
    ),
    tag = "Conversion"
)]
pub async fn handle_convert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ConvertParams>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let id = SessionId::new(id);
    let session = state.sessions.require(&id).await?;

    // The body limit layer rejects oversized uploads before the decoder sees them
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::from(SourceError::TooLarge {
                max: state.decoder.max_bytes(),
            })
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;

    let config = params.resolve(state.config.defaults);
    config.validate().map_err(ConvertError::from)?;
    let kind = params.kind.unwrap_or(RequestKind::GenerateGrid);

    let decoded = state.decoder.decode_blocking(body.clone()).await?;
    tracing::info!(
        session = %id,
        kind = %kind,
        format = %decoded.format,
        source_width = decoded.image.width(),
        source_height = decoded.image.height(),
        width = config.width,
        height = config.height,
        color_count = config.color_count,
        dithering = config.dithering,
        "Conversion requested"
    );

    let request = session
        .lock()
        .await
        .editor
        .begin_conversion(kind, decoded.image, config);
    let request_id = request.request_id().clone();

    let response = state.conversion.run(request).await;

    let mut entry = session.lock().await;
    match entry.editor.complete(response.clone()) {
        Completion::Stale => {
            tracing::debug!(session = %id, request_id = %request_id, "Discarded stale conversion");
            Err(ApiError::Superseded(request_id.to_string()))
        }
        Completion::Applied => {
            entry.config = Some(config);
            entry.source = Some(StoredSource {
                format: decoded.format,
                bytes: body,
            });
            Ok(Json(response).into_response())
        }
        Completion::Delivered(_) => Ok(Json(response).into_response()),
        Completion::Failed(error) => {
            tracing::warn!(session = %id, request_id = %request_id, %error, "Conversion failed");
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(response)).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_fall_back_to_defaults() {
        let params = ConvertParams {
            width: Some(10),
            ..ConvertParams::default()
        };
        let config = params.resolve(Config::new(32, 24, 6).dithering(true));
        assert_eq!(config, Config::new(10, 24, 6).dithering(true));
    }

    #[test]
    fn test_params_from_query() {
        let params: ConvertParams = serde_json::from_value(serde_json::json!({
            "colorCount": 4,
            "type": "quantize"
        }))
        .unwrap();
        assert_eq!(params.color_count, Some(4));
        assert_eq!(params.kind, Some(RequestKind::Quantize));
    }
}
