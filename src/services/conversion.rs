//! Asynchronous boundary around the synchronous conversion pipeline.

use pixel_grid::{execute, ConversionRequest, ConversionResponse, ConvertError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Runs conversion requests on the blocking thread pool, at most
/// `max_concurrent` at a time.
pub struct ConversionService {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
}

impl ConversionService {
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Conversions that could start right now without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Execute one request.
    ///
    /// Never fails: pipeline errors, and a worker task that panicked, come
    /// back as a response with `error` set.
    pub async fn run(&self, request: ConversionRequest) -> ConversionResponse {
        let kind = request.kind();
        let request_id = request.request_id().clone();

        let permit = match self.permits.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                let err = ConvertError::ConversionFailed(format!("conversion service closed: {e}"));
                return ConversionResponse::failure(kind, request_id, err.to_string());
            }
        };

        let started = Instant::now();
        tracing::debug!(request_id = %request_id, kind = %kind, "Conversion started");

        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            execute(&request)
        })
        .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Conversion task failed");
                let err = ConvertError::ConversionFailed(format!("worker task failed: {e}"));
                ConversionResponse::failure(kind, request_id.clone(), err.to_string())
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &response.error {
            Some(error) => {
                tracing::warn!(request_id = %request_id, kind = %kind, elapsed_ms, %error, "Conversion failed")
            }
            None => tracing::info!(request_id = %request_id, kind = %kind, elapsed_ms, "Conversion finished"),
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_grid::{
        Color, Config, ConversionPayload, ConversionResult, RequestId, RequestKind, SourceImage,
    };

    fn request(kind: RequestKind, id: &str, config: Config) -> ConversionRequest {
        let image = SourceImage::filled(8, 8, Color::rgba(200, 10, 10, 255)).unwrap();
        ConversionRequest::new(
            kind,
            ConversionPayload {
                image_data: Some(image),
                config: Some(config),
                request_id: RequestId::new(id),
            },
        )
    }

    #[tokio::test]
    async fn test_generate_grid() {
        let service = ConversionService::new(2);
        let response = service
            .run(request(RequestKind::GenerateGrid, "req-1", Config::new(4, 4, 2)))
            .await;

        assert!(!response.is_error());
        assert_eq!(response.request_id.as_str(), "req-1");
        match response.result {
            Some(ConversionResult::Grid(grid)) => assert_eq!(grid.width(), 4),
            other => panic!("expected grid, got {other:?}"),
        }
        assert_eq!(service.available(), 2);
    }

    #[tokio::test]
    async fn test_invalid_config_is_reported() {
        let service = ConversionService::new(1);
        let response = service
            .run(request(RequestKind::Quantize, "req-9", Config::new(4, 4, 99)))
            .await;

        assert!(response.is_error());
        assert!(response.result.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("unsupported config: color count 99 out of range (2..=14)")
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_permits() {
        let service = Arc::new(ConversionService::new(1));
        let mut handles = Vec::new();
        for n in 0..4 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .run(request(RequestKind::Resample, &format!("req-{n}"), Config::new(2, 2, 2)))
                    .await
            }));
        }
        for handle in handles {
            let response = handle.await.unwrap();
            assert!(!response.is_error());
        }
        assert_eq!(service.available(), 1);
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        assert_eq!(ConversionService::new(0).max_concurrent(), 1);
    }
}
