use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixel_grid::{ConvertError, GridError, RenderError, SessionError};
use serde_json::json;
use thiserror::Error;

use crate::services::{ExportError, SourceError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("Upload rejected: {0}")]
    Source(#[from] SourceError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConvertError),

    #[error("Edit rejected: {0}")]
    Session(#[from] SessionError),

    #[error("Request {0} was superseded by a newer conversion")]
    Superseded(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Source(e) => match e {
                SourceError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                SourceError::UnsupportedFormat(_) | SourceError::UnknownFormat => {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE
                }
                SourceError::Empty | SourceError::Decode(_) | SourceError::Image(_) => {
                    StatusCode::BAD_REQUEST
                }
            },
            ApiError::Conversion(e) if e.is_recoverable() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Session(e) => match e {
                SessionError::NoGrid => StatusCode::CONFLICT,
                SessionError::BrushSize(_) => StatusCode::BAD_REQUEST,
                SessionError::Grid(GridError::ShapeMismatch { .. }) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                SessionError::Grid(_) => StatusCode::BAD_REQUEST,
            },
            ApiError::Superseded(_) => StatusCode::CONFLICT,
            ApiError::Export(ExportError::Render(RenderError::InvalidScale(_))) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_grid::ConfigError;

    #[test]
    fn test_api_error_bad_request() {
        let error = ApiError::BadRequest("missing body".to_string());
        assert_eq!(error.to_string(), "Bad request: missing body");
    }

    #[test]
    fn test_api_error_session_not_found() {
        assert_eq!(ApiError::SessionNotFound.to_string(), "Session not found");
    }

    #[test]
    fn test_api_error_superseded() {
        let error = ApiError::Superseded("req-1".to_string());
        assert_eq!(
            error.to_string(),
            "Request req-1 was superseded by a newer conversion"
        );
    }

    #[test]
    fn test_api_error_conversion() {
        let error: ApiError = ConvertError::from(ConfigError::ColorCount(20)).into();
        assert_eq!(
            error.to_string(),
            "Conversion error: unsupported config: color count 20 out of range (2..=14)"
        );
    }

    #[test]
    fn test_api_error_session() {
        let error: ApiError = SessionError::NoGrid.into();
        assert_eq!(error.to_string(), "Edit rejected: session has no grid");
    }

    #[test]
    fn test_api_error_upload_too_large() {
        let error: ApiError = SourceError::TooLarge { max: 10 }.into();
        assert_eq!(
            error.to_string(),
            "Upload rejected: upload exceeds the 10 byte limit"
        );
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::BadRequest("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::SessionNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::Superseded("req-1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::from(SourceError::TooLarge { max: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let response = ApiError::from(SourceError::UnknownFormat).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response =
            ApiError::from(ConvertError::from(ConfigError::Width(0))).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response =
            ApiError::from(ConvertError::ConversionFailed("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError::from(SessionError::NoGrid).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response =
            ApiError::from(SessionError::Grid(GridError::OutOfBounds { x: 9, y: 9 })).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response =
            ApiError::from(ExportError::Render(RenderError::InvalidScale(3))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
