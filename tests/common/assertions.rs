//! Custom assertions for integration tests.

use axum::http::StatusCode;

use super::app::TestResponse;

/// Assert response has the expected status, showing the body otherwise
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is successful (2xx)
pub fn assert_ok(response: &TestResponse) {
    assert!(
        response.status.is_success(),
        "Expected success status, got {}. Body: {}",
        response.status,
        response.text()
    );
}

/// Assert response is a PNG image with the expected dimensions
pub fn assert_png(response: &TestResponse, width: u32, height: u32) {
    assert_ok(response);
    assert!(response.is_png(), "Response is not a PNG");
    assert_eq!(
        response
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    // IHDR: width and height are the first two big-endian u32s after the chunk header
    let bytes = response.bytes();
    assert!(bytes.len() > 24, "PNG too short");
    let w = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let h = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!((w, h), (width, height), "PNG dimensions mismatch");
}

/// Assert response is a JSON error with the expected status and a message
/// containing `fragment`
pub fn assert_json_error(response: &TestResponse, expected: StatusCode, fragment: &str) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], expected.as_u16());
    let message = json["error"].as_str().unwrap_or_default();
    assert!(
        message.contains(fragment),
        "Expected error containing {:?}, got {:?}",
        fragment,
        message
    );
}
