//! The conversion request/response protocol.
//!
//! Requests are a tagged sum over the three pipeline depths and are matched
//! exhaustively by [`execute`]. Execution is synchronous and stateless; the
//! asynchronous boundary (and the decision to drop superseded responses)
//! belongs to the caller, see [`crate::EditorSession`].

mod message;

pub use message::{
    ConversionPayload, ConversionRequest, ConversionResponse, ConversionResult, RequestId,
    RequestKind,
};

use crate::api::{ConvertError, PixelArtConverter};

/// Run one request to completion.
///
/// The config is validated before any work. Errors are reported in the
/// response's `error` field; this function never fails.
pub fn execute(request: &ConversionRequest) -> ConversionResponse {
    let kind = request.kind();
    let request_id = request.request_id().clone();
    match run(request) {
        Ok(result) => ConversionResponse::success(kind, request_id, result),
        Err(err) => ConversionResponse::failure(kind, request_id, err.to_string()),
    }
}

/// Run one request, returning the typed result or error.
pub fn run(request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
    let payload = request.payload();
    let config = payload.config.unwrap_or_default();
    config.validate()?;

    let image = payload
        .image_data
        .as_ref()
        .ok_or_else(|| ConvertError::SourceUnavailable("request carries no image data".into()))?;

    let converter = PixelArtConverter::new(config);
    match request {
        ConversionRequest::Resample(_) => converter.resample_image(image).map(ConversionResult::Resampled),
        ConversionRequest::Quantize(_) => converter.quantize(image).map(ConversionResult::Quantized),
        ConversionRequest::GenerateGrid(_) => converter.convert(image).map(ConversionResult::Grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Config;
    use crate::color::Color;
    use crate::resample::SourceImage;

    fn payload(config: Option<Config>, image: Option<SourceImage>) -> ConversionPayload {
        ConversionPayload {
            image_data: image,
            config,
            request_id: RequestId::new("req-1"),
        }
    }

    fn red_image() -> SourceImage {
        SourceImage::filled(4, 4, Color::rgba(255, 0, 0, 255)).unwrap()
    }

    #[test]
    fn test_generate_grid() {
        let request = ConversionRequest::GenerateGrid(payload(
            Some(Config::new(2, 2, 4)),
            Some(red_image()),
        ));
        let response = execute(&request);
        assert_eq!(response.kind, RequestKind::GenerateGrid);
        assert_eq!(response.request_id.as_str(), "req-1");
        match response.result {
            Some(ConversionResult::Grid(grid)) => {
                assert_eq!((grid.width(), grid.height()), (2, 2));
                assert_eq!(grid.palette().colors(), &[Color::rgb(255, 0, 0)]);
            }
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn test_quantize() {
        let request =
            ConversionRequest::Quantize(payload(Some(Config::new(2, 2, 4)), Some(red_image())));
        match run(&request).unwrap() {
            ConversionResult::Quantized(q) => assert_eq!(q.indices, vec![0; 4]),
            other => panic!("expected quantized, got {:?}", other),
        }
    }

    #[test]
    fn test_resample() {
        let request =
            ConversionRequest::Resample(payload(Some(Config::new(2, 1, 4)), Some(red_image())));
        match run(&request).unwrap() {
            ConversionResult::Resampled(img) => {
                assert_eq!((img.width(), img.height()), (2, 1));
                assert_eq!(img.data().len(), 8);
            }
            other => panic!("expected resampled, got {:?}", other),
        }
    }

    #[test]
    fn test_config_validated_first() {
        let request = ConversionRequest::Resample(payload(Some(Config::new(0, 1, 4)), None));
        let response = execute(&request);
        assert!(response.result.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("unsupported config: width 0 out of range (1..=500)")
        );
    }

    #[test]
    fn test_missing_image() {
        let request = ConversionRequest::Quantize(payload(None, None));
        assert!(matches!(run(&request), Err(ConvertError::SourceUnavailable(_))));
    }
}
