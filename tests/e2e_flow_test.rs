//! End-to-end flow tests covering complete editing scenarios.

mod common;

use common::{fixtures, TestApp};
use knemo::models::Project;
use serde_json::{json, Value};

#[tokio::test]
async fn test_convert_edit_export_flow() {
    let app = TestApp::new();

    // Step 1: open a session and convert an upload
    let id = app.create_session().await;
    let response = app
        .convert(&id, "width=8&height=4&colorCount=2", fixtures::split_png(64, 32))
        .await;
    common::assert_ok(&response);
    let converted: Value = response.json();
    let right = converted["result"]["cells"][0][7]["colorIndex"].clone();

    // Step 2: switch to edit mode and pick the right-hand color
    app.put_json(
        &format!("/api/sessions/{id}/preferences"),
        json!({"mode": "edit", "tool": "eyedropper"}),
    )
    .await;
    let picked: Value = app
        .post_json(&format!("/api/sessions/{id}/tool"), json!({"x": 7, "y": 3}))
        .await
        .json();
    assert_eq!(picked["session"]["preferences"]["selectedColor"], right);

    // Step 3: flood the left half with it and commit
    app.put_json(
        &format!("/api/sessions/{id}/preferences"),
        json!({"tool": "fill"}),
    )
    .await;
    let filled: Value = app
        .post_json(
            &format!("/api/sessions/{id}/tool"),
            json!({"x": 0, "y": 0, "commit": true}),
        )
        .await
        .json();
    assert_eq!(filled["changed"], 16);
    assert_eq!(filled["session"]["history"]["len"], 2);

    // Step 4: the export is a single color
    let response = app
        .get(&format!("/api/sessions/{id}/export.png?scale=2&grid=false"))
        .await;
    common::assert_png(&response, 16, 8);
    let img = fixtures::decode_png(response.bytes());
    let first = img.get_pixel(0, 0);
    assert!(img.pixels().all(|p| p == first));

    // Step 5: undo brings the two halves back
    app.post(&format!("/api/sessions/{id}/undo")).await;
    let response = app
        .get(&format!("/api/sessions/{id}/export.png?grid=false"))
        .await;
    let img = fixtures::decode_png(response.bytes());
    assert_ne!(img.get_pixel(0, 0), img.get_pixel(7, 0));

    // Step 6: snapshot the project; it round-trips through serde
    let response = app
        .get(&format!("/api/sessions/{id}/project?name=Flags&includeSource=true"))
        .await;
    common::assert_ok(&response);
    let project: Project = response.json();
    assert_eq!(project.name, "Flags");
    assert_eq!(project.grid.width(), 8);
    assert_eq!(project.config.color_count, 2);
    assert!(project.source_image.is_some());

    // Step 7: close the session
    let response = app.delete(&format!("/api/sessions/{id}")).await;
    common::assert_status(&response, axum::http::StatusCode::NO_CONTENT);
    assert!(app.sessions.is_empty().await);
}

#[tokio::test]
async fn test_reconvert_replaces_grid_and_keeps_history() {
    let app = TestApp::new();
    let id = app
        .session_with_grid("width=4&height=4", fixtures::checker_png(16, 16, 4))
        .await;

    // A new upload replaces the grid as a new snapshot
    let response = app
        .convert(&id, "width=6&height=3", fixtures::split_png(60, 30))
        .await;
    common::assert_ok(&response);

    let state = app.session_state(&id).await;
    assert_eq!(state["grid"]["width"], 6);
    assert_eq!(state["history"]["len"], 2);

    // and the old grid is one undo away
    let json: Value = app.post(&format!("/api/sessions/{id}/undo")).await.json();
    assert_eq!(json["session"]["grid"]["width"], 4);
}

#[tokio::test]
async fn test_failed_conversion_keeps_previous_grid() {
    let app = TestApp::new();
    let id = app
        .session_with_grid("width=4&height=4", fixtures::checker_png(16, 16, 4))
        .await;

    let response = app.convert(&id, "", b"garbage".to_vec()).await;
    assert!(response.status.is_client_error());

    let state = app.session_state(&id).await;
    assert_eq!(state["grid"]["width"], 4);
    assert_eq!(state["history"]["len"], 1);
}
