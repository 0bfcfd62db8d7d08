//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use knemo::assets::AssetLoader;
use knemo::models::AppConfig;
use knemo::server::{build_router, create_app_state, create_app_state_with_config, AppState};
use knemo::services::InMemorySessionStore;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
    pub sessions: Arc<InMemorySessionStore>,
}

impl TestApp {
    /// Create a new test application using the embedded config
    pub fn new() -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None));
        let state = create_app_state(asset_loader).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application with a custom config
    pub fn with_config(config: AppConfig) -> Self {
        Self::from_state(create_app_state_with_config(config))
    }

    fn from_state(state: AppState) -> Self {
        let sessions = state.sessions.clone();
        // Build router using shared server module (same as production)
        let router = build_router(state.clone());
        Self {
            router,
            state,
            sessions,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request to the given path
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request without a body
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: serde_json::Value) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a PUT request with JSON body
    pub async fn put_json(&self, path: &str, body: serde_json::Value) -> TestResponse {
        let request = Request::put(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a POST request with a raw byte body
    pub async fn post_bytes(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Create a session and return its id
    pub async fn create_session(&self) -> String {
        let response = self.post("/api/sessions").await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        let json: serde_json::Value = response.json();
        json["id"].as_str().unwrap().to_string()
    }

    /// Upload an image for conversion with the given query string
    pub async fn convert(&self, session: &str, query: &str, image: Vec<u8>) -> TestResponse {
        let path = if query.is_empty() {
            format!("/api/sessions/{session}/convert")
        } else {
            format!("/api/sessions/{session}/convert?{query}")
        };
        self.post_bytes(&path, image).await
    }

    /// Create a session holding a converted grid
    pub async fn session_with_grid(&self, query: &str, image: Vec<u8>) -> String {
        let session = self.create_session().await;
        let response = self.convert(&session, query, image).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        session
    }

    /// Current session state as JSON
    pub async fn session_state(&self, session: &str) -> serde_json::Value {
        let response = self.get(&format!("/api/sessions/{session}")).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
