//! Inference service integrations
//!
//! [`DiseaseDetector`] is the seam between the app and whatever answers
//! predictions: the remote service ([`HttpDetector`]) or the in-process
//! stand-in ([`MockDetector`]).

pub mod image;
pub mod mock;
pub mod prediction;

pub use image::{load_image, LoadedImage};
pub use mock::MockDetector;
pub use prediction::HttpDetector;

use async_trait::async_trait;
use shared::{HealthReport, ImageRef, ModelStatus, Prediction, PredictionRequest};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Something that classifies leaf images
#[async_trait]
pub trait DiseaseDetector: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    async fn check_health(&self) -> AppResult<HealthReport>;

    async fn model_status(&self) -> AppResult<ModelStatus>;

    /// Classify an image with the model of the requested crop
    async fn detect(&self, request: &PredictionRequest) -> AppResult<Prediction>;

    /// Run every crop model and keep the most confident answer
    async fn detect_auto(&self, image: &ImageRef) -> AppResult<Prediction>;
}

/// Build the detector selected by configuration
pub fn detector_from_config(config: &Config) -> AppResult<Arc<dyn DiseaseDetector>> {
    if config.use_mock_service {
        tracing::info!("Using mock inference service");
        return Ok(Arc::new(MockDetector::new(Duration::from_millis(
            config.mock_latency_ms,
        ))));
    }

    tracing::info!("Using inference service at {}", config.api.base_url);
    Ok(Arc::new(HttpDetector::new(
        config.api.clone(),
        config.retry.clone(),
    )?))
}

/// Run `fut` until it completes or `token` fires. On cancellation the
/// future is dropped, which aborts any request it has in flight.
pub async fn cancellable<T, F>(token: &CancellationToken, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::info!("Request cancelled");
            Err(AppError::Cancelled)
        }
        result = fut => result,
    }
}
