//! Inference service client
//!
//! Client for the remote plant-disease classification service.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    normalize_auto_detection, normalize_prediction, AutoDetectResponse, Crop, HealthReport,
    ImageRef, ModelStatus, Prediction, PredictionRequest, WirePrediction,
};
use std::time::{Duration, Instant};

use super::image::{load_image, LoadedImage};
use super::DiseaseDetector;
use crate::config::{ApiConfig, RetryConfig, UploadEncoding};
use crate::error::{AppError, AppResult};

/// Client for the inference service
#[derive(Clone)]
pub struct HttpDetector {
    config: ApiConfig,
    retry: RetryConfig,
    http_client: Client,
}

/// JSON upload body used when multipart is not available
#[derive(Debug, Serialize)]
pub struct Base64Upload<'a> {
    pub image_base64: String,
    pub filename: &'a str,
    pub content_type: &'a str,
}

impl HttpDetector {
    /// Create a new inference service client
    pub fn new(config: ApiConfig, retry: RetryConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            retry,
            http_client,
        })
    }

    /// Client for `base_url` with default paths and retry policy
    pub fn with_base_url(base_url: impl Into<String>) -> AppResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(config, RetryConfig::default())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn prediction_url(&self, crop: Crop) -> String {
        self.url(&self.config.prediction_path.replace("{crop}", crop.as_str()))
    }

    /// Attach the image to a POST request in the configured encoding
    fn upload_request(&self, url: &str, image: &LoadedImage) -> AppResult<RequestBuilder> {
        let request = self.http_client.post(url);

        match self.config.upload_encoding {
            UploadEncoding::Multipart => {
                let part = multipart::Part::bytes(image.bytes.clone())
                    .file_name(image.filename.clone())
                    .mime_str(image.format.mime_type())
                    .map_err(|e| AppError::Configuration(format!("Invalid MIME type: {}", e)))?;
                let form = multipart::Form::new().part(self.config.upload_field.clone(), part);
                Ok(request.multipart(form))
            }
            UploadEncoding::Base64 => Ok(request.json(&Base64Upload {
                image_base64: BASE64.encode(&image.bytes),
                filename: &image.filename,
                content_type: image.format.mime_type(),
            })),
        }
    }

    /// Send a request, retrying transport failures with a fixed delay.
    /// `build` is called once per attempt.
    async fn send_with_retry<F>(&self, build: F) -> AppResult<Response>
    where
        F: Fn() -> AppResult<RequestBuilder> + Send + Sync,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match build()?.send().await {
                Ok(response) => return check_status(response).await,
                Err(e) => AppError::from(e),
            };

            if !err.is_retryable() || attempt >= max_attempts {
                tracing::error!("Request failed after {} attempt(s): {}", attempt, err);
                return Err(err);
            }

            tracing::warn!(
                "Attempt {}/{} failed: {}; retrying in {}ms",
                attempt,
                max_attempts,
                err,
                self.retry.delay_ms
            );
            tokio::time::sleep(Duration::from_millis(self.retry.delay_ms)).await;
            attempt += 1;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self
            .send_with_retry(|| Ok(self.http_client.get(&url)))
            .await?;
        decode(response).await
    }
}

/// Turn a non-2xx response into [`AppError::HttpStatus`]
async fn check_status(response: Response) -> AppResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::error!("Inference service returned {}: {}", status, body);

    Err(AppError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!("Undecodable body: {}", String::from_utf8_lossy(&bytes));
        AppError::Decode(format!("Failed to parse response: {}", e))
    })
}

#[async_trait]
impl DiseaseDetector for HttpDetector {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn check_health(&self) -> AppResult<HealthReport> {
        let report: HealthReport = self.get_json(&self.config.health_path).await?;
        tracing::info!(
            "Service status {}, {} model(s) loaded",
            report.status,
            report.models_loaded
        );
        Ok(report)
    }

    async fn model_status(&self) -> AppResult<ModelStatus> {
        self.get_json(&self.config.model_status_path).await
    }

    async fn detect(&self, request: &PredictionRequest) -> AppResult<Prediction> {
        let image = load_image(&request.image, request.crop.as_str()).await?;
        let url = self.prediction_url(request.crop);

        tracing::info!(
            "Uploading {} ({} bytes) for {} prediction",
            image.filename,
            image.bytes.len(),
            request.crop
        );
        let started = Instant::now();

        let response = self
            .send_with_retry(|| self.upload_request(&url, &image))
            .await?;
        let wire: WirePrediction = decode(response).await?;
        tracing::debug!("Raw prediction: {:?}", wire);

        let prediction = normalize_prediction(wire, Some(request.crop), Utc::now())?;
        tracing::info!(
            "Predicted {} ({:.2}%) in {}ms",
            prediction.label,
            prediction.confidence,
            started.elapsed().as_millis()
        );

        Ok(prediction)
    }

    async fn detect_auto(&self, image: &ImageRef) -> AppResult<Prediction> {
        let image = load_image(image, "auto").await?;
        let url = self.url(&self.config.auto_detect_path);

        tracing::info!("Uploading {} for auto-detection", image.filename);

        let response = self
            .send_with_retry(|| self.upload_request(&url, &image))
            .await?;
        let detection: AutoDetectResponse = decode(response).await?;

        for (crop, wire) in &detection.results {
            if let Some(error) = &wire.error {
                tracing::warn!("{} model failed during auto-detection: {}", crop, error);
            }
        }

        let prediction = normalize_auto_detection(detection, Utc::now())?;
        tracing::info!(
            "Auto-detected {} / {} ({:.2}%)",
            prediction.crop,
            prediction.label,
            prediction.confidence
        );

        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_url_fills_template() {
        let detector = HttpDetector::with_base_url("http://10.0.2.2:8000/").unwrap();
        assert_eq!(
            detector.prediction_url(Crop::Maize),
            "http://10.0.2.2:8000/predict/maize"
        );
        assert_eq!(detector.url("/health"), "http://10.0.2.2:8000/health");
    }

    #[test]
    fn test_legacy_detect_path() {
        let config = ApiConfig {
            base_url: "http://localhost:8000".into(),
            prediction_path: "/detect/{crop}".into(),
            ..ApiConfig::default()
        };
        let detector = HttpDetector::new(config, RetryConfig::default()).unwrap();
        assert_eq!(
            detector.prediction_url(Crop::Cassava),
            "http://localhost:8000/detect/cassava"
        );
    }

    #[test]
    fn test_base64_body_shape() {
        let body = Base64Upload {
            image_base64: BASE64.encode([0xff, 0xd8]),
            filename: "leaf_image_tomato.jpg",
            content_type: "image/jpeg",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["image_base64"], "/9g=");
        assert_eq!(json["filename"], "leaf_image_tomato.jpg");
        assert_eq!(json["content_type"], "image/jpeg");
    }
}
