//! Wire types of the conversion request/response protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::Config;
use crate::grid::Grid;
use crate::quantize::Quantized;
use crate::resample::SourceImage;

/// Correlates a response with the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Wrap an id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which pipeline stage a request runs up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    /// Resample only
    Resample,
    /// Resample and quantize
    Quantize,
    /// Full pipeline producing a grid
    GenerateGrid,
}

impl RequestKind {
    /// Wire name (`"resample"`, `"quantize"`, `"generate-grid"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Resample => "resample",
            RequestKind::Quantize => "quantize",
            RequestKind::GenerateGrid => "generate-grid",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resample" => Ok(RequestKind::Resample),
            "quantize" => Ok(RequestKind::Quantize),
            "generate-grid" => Ok(RequestKind::GenerateGrid),
            other => Err(format!("unknown request type: {}", other)),
        }
    }
}

/// Payload shared by every request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionPayload {
    /// Source pixels; required for every kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<SourceImage>,
    /// Conversion settings; [`Config::default`] when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
    /// Correlation id
    pub request_id: RequestId,
}

/// A request to the conversion worker.
///
/// On the wire: `{"type": "generate-grid", "payload": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ConversionRequest {
    /// Resample only
    Resample(ConversionPayload),
    /// Resample and quantize
    Quantize(ConversionPayload),
    /// Full pipeline
    GenerateGrid(ConversionPayload),
}

impl ConversionRequest {
    /// Build a request of the given kind.
    pub fn new(kind: RequestKind, payload: ConversionPayload) -> Self {
        match kind {
            RequestKind::Resample => ConversionRequest::Resample(payload),
            RequestKind::Quantize => ConversionRequest::Quantize(payload),
            RequestKind::GenerateGrid => ConversionRequest::GenerateGrid(payload),
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            ConversionRequest::Resample(_) => RequestKind::Resample,
            ConversionRequest::Quantize(_) => RequestKind::Quantize,
            ConversionRequest::GenerateGrid(_) => RequestKind::GenerateGrid,
        }
    }

    pub fn payload(&self) -> &ConversionPayload {
        match self {
            ConversionRequest::Resample(p)
            | ConversionRequest::Quantize(p)
            | ConversionRequest::GenerateGrid(p) => p,
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.payload().request_id
    }
}

/// Successful result of a request.
///
/// Untagged on the wire; the shapes are disjoint (`cells`, `indices`,
/// `data`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionResult {
    /// `generate-grid` result
    Grid(Grid),
    /// `quantize` result: `{palette, indices}`
    Quantized(Quantized),
    /// `resample` result: one RGBA pixel per cell
    Resampled(SourceImage),
}

/// Response from the conversion worker.
///
/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    /// Kind of the originating request
    #[serde(rename = "type")]
    pub kind: RequestKind,
    /// Id of the originating request
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ConversionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResponse {
    pub fn success(kind: RequestKind, request_id: RequestId, result: ConversionResult) -> Self {
        Self {
            kind,
            request_id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(kind: RequestKind, request_id: RequestId, error: impl Into<String>) -> Self {
        Self {
            kind,
            request_id,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let json = r#"{
            "type": "generate-grid",
            "payload": {
                "imageData": {"width": 1, "height": 1, "data": [1, 2, 3, 255]},
                "config": {"width": 4, "height": 4, "colorCount": 2, "dithering": true},
                "requestId": "req-7"
            }
        }"#;
        let request: ConversionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind(), RequestKind::GenerateGrid);
        assert_eq!(request.request_id().as_str(), "req-7");
        assert_eq!(request.payload().config, Some(Config::new(4, 4, 2).dithering(true)));

        let back = serde_json::to_value(&request).unwrap();
        assert_eq!(back["type"], "generate-grid");
        assert_eq!(back["payload"]["requestId"], "req-7");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"type": "sharpen", "payload": {"requestId": "x"}}"#;
        assert!(serde_json::from_str::<ConversionRequest>(json).is_err());
    }

    #[test]
    fn test_failure_response_shape() {
        let response =
            ConversionResponse::failure(RequestKind::Quantize, RequestId::new("req-1"), "boom");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "quantize", "requestId": "req-1", "error": "boom"})
        );
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("resample".parse::<RequestKind>(), Ok(RequestKind::Resample));
        assert!("nope".parse::<RequestKind>().is_err());
        assert_eq!(RequestKind::GenerateGrid.to_string(), "generate-grid");
    }
}
