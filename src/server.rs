//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::{ConversionService, InMemorySessionStore, PngExporter, SourceDecoder};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: Arc<InMemorySessionStore>,
    pub conversion: Arc<ConversionService>,
    pub decoder: Arc<SourceDecoder>,
    pub exporter: PngExporter,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    Ok(create_app_state_with_config(config))
}

/// Create application state from an already loaded config.
pub fn create_app_state_with_config(config: AppConfig) -> AppState {
    let sessions = Arc::new(InMemorySessionStore::with_history_limit(
        config.history.limit,
    ));
    let conversion = Arc::new(ConversionService::new(config.conversion.max_concurrent));
    let decoder = Arc::new(SourceDecoder::new(&config.upload));
    let exporter = PngExporter::new(config.export.optimize);

    AppState {
        config: Arc::new(config),
        sessions,
        conversion,
        decoder,
        exporter,
    }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.upload.max_bytes;

    Router::new()
        .route("/api/sessions", post(api::handle_create_session))
        .route(
            "/api/sessions/:id",
            get(api::handle_get_session).delete(api::handle_delete_session),
        )
        .route("/api/sessions/:id/convert", post(api::handle_convert))
        .route("/api/sessions/:id/pixels", post(api::handle_set_pixels))
        .route("/api/sessions/:id/fill", post(api::handle_fill))
        .route("/api/sessions/:id/tool", post(api::handle_apply_tool))
        .route("/api/sessions/:id/commit", post(api::handle_commit))
        .route("/api/sessions/:id/undo", post(api::handle_undo))
        .route("/api/sessions/:id/redo", post(api::handle_redo))
        .route("/api/sessions/:id/revert", post(api::handle_revert))
        .route("/api/sessions/:id/history", delete(api::handle_clear_history))
        .route(
            "/api/sessions/:id/preferences",
            put(api::handle_update_preferences),
        )
        .route("/api/sessions/:id/export.png", get(api::handle_export))
        .route("/api/sessions/:id/project", get(api::handle_project))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
