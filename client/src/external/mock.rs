//! In-process stand-in for the inference service
//!
//! Answers every crop with a fixed distribution so the app can be
//! exercised without a model server. Payloads go through the same
//! normalization as real ones.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use shared::{
    normalize_auto_detection, normalize_prediction, AutoDetectResponse, ConfidenceUnit, Crop,
    HealthReport, ImageRef, ModelStatus, Prediction, PredictionRequest, WirePrediction,
};
use std::collections::BTreeMap;
use std::time::Duration;

use super::image::load_image;
use super::DiseaseDetector;
use crate::error::AppResult;

const MOCK_VERSION: &str = "1.0.0";

/// Fixed class distribution per crop, in percent
fn distribution(crop: Crop) -> &'static [(&'static str, f64)] {
    match crop {
        Crop::Cassava => &[
            ("mosaic_disease", 84.2),
            ("brown_streak_disease", 8.1),
            ("green_mottle", 4.2),
            ("healthy", 2.5),
            ("bacterial_blight", 1.0),
        ],
        Crop::Maize => &[
            ("blight", 94.2),
            ("common_rust", 3.1),
            ("gray_leaf_spot", 1.8),
            ("healthy", 0.9),
        ],
        Crop::Tomato => &[
            ("early_blight", 75.4),
            ("late_blight", 12.3),
            ("bacterial_spot", 6.8),
            ("healthy", 2.4),
            ("leaf_mold", 1.2),
            ("mosaic_virus", 0.8),
            ("septoria_spot", 0.5),
            ("spider_mites", 0.3),
            ("target_spot", 0.2),
            ("yellow_leaf_curl_virus", 0.1),
        ],
    }
}

/// Mock detector with optional simulated latency
#[derive(Debug, Clone, Default)]
pub struct MockDetector {
    latency: Duration,
}

impl MockDetector {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Payload the mock service sends for `crop`
    pub fn payload(crop: Crop) -> WirePrediction {
        let probabilities: BTreeMap<String, f64> = distribution(crop)
            .iter()
            .map(|(class, pct)| (class.to_string(), *pct))
            .collect();
        let (top, confidence) = distribution(crop)[0];

        WirePrediction {
            crop_type: Some(crop.as_str().to_string()),
            predicted_disease: Some(top.to_string()),
            confidence: Some(confidence),
            confidence_unit: Some(ConfidenceUnit::Percent),
            all_probabilities: Some(probabilities),
            status: Some(if top == "healthy" { "healthy" } else { "diseased" }.to_string()),
            ..Default::default()
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl DiseaseDetector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn check_health(&self) -> AppResult<HealthReport> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            models_loaded: Crop::ALL.len() as u32,
            available_crops: Crop::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            message: Some("Plant Disease Detection API is running".to_string()),
            version: Some(MOCK_VERSION.to_string()),
        })
    }

    async fn model_status(&self) -> AppResult<ModelStatus> {
        Ok(ModelStatus(
            Crop::ALL
                .iter()
                .map(|crop| {
                    (
                        crop.as_str().to_string(),
                        json!({
                            "loaded": true,
                            "classes": crop.classes(),
                            "mock": true,
                        }),
                    )
                })
                .collect(),
        ))
    }

    async fn detect(&self, request: &PredictionRequest) -> AppResult<Prediction> {
        load_image(&request.image, request.crop.as_str()).await?;
        self.simulate_latency().await;

        let mut wire = Self::payload(request.crop);
        wire.processing_time_ms = Some(self.latency.as_secs_f64() * 1000.0);
        tracing::debug!("Mock prediction for {}", request.crop);

        Ok(normalize_prediction(wire, Some(request.crop), Utc::now())?)
    }

    async fn detect_auto(&self, image: &ImageRef) -> AppResult<Prediction> {
        load_image(image, "auto").await?;
        self.simulate_latency().await;

        let response = AutoDetectResponse {
            message: Some("Auto-detection completed".to_string()),
            results: Crop::ALL
                .iter()
                .map(|crop| (crop.as_str().to_string(), Self::payload(*crop)))
                .collect(),
        };

        Ok(normalize_auto_detection(response, Utc::now())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf() -> (tempfile::TempDir, ImageRef) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.jpg");
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();
        let image = ImageRef::new(format!("file://{}", path.display()));
        (dir, image)
    }

    #[test]
    fn test_distributions_sum_to_hundred() {
        for crop in Crop::ALL {
            let total: f64 = distribution(crop).iter().map(|(_, pct)| pct).sum();
            assert!((total - 100.0).abs() < 1e-9, "{} sums to {}", crop, total);
            for (class, _) in distribution(crop) {
                assert!(crop.knows_class(class), "{} has no class {}", crop, class);
            }
        }
    }

    #[tokio::test]
    async fn test_maize_prediction() {
        let (_dir, image) = leaf();
        let prediction = MockDetector::default()
            .detect(&PredictionRequest::new(Crop::Maize, image))
            .await
            .unwrap();

        assert_eq!(prediction.label, "Corn Leaf Blight");
        assert_eq!(prediction.confidence, 94.2);
        assert_eq!(prediction.probabilities["Common Rust"], 3.1);
    }

    #[tokio::test]
    async fn test_every_crop_normalizes() {
        let (_dir, image) = leaf();
        let detector = MockDetector::default();
        for crop in Crop::ALL {
            let prediction = detector
                .detect(&PredictionRequest::new(crop, image.clone()))
                .await
                .unwrap();
            assert_eq!(prediction.crop, crop);
            assert!((prediction.probability_total() - 100.0).abs() < 0.01);
        }
    }

    #[tokio::test]
    async fn test_auto_detection_picks_most_confident() {
        let (_dir, image) = leaf();
        let prediction = MockDetector::default().detect_auto(&image).await.unwrap();
        assert_eq!(prediction.crop, Crop::Maize);
    }

    #[tokio::test]
    async fn test_unreadable_image_fails_like_the_service() {
        let err = MockDetector::default()
            .detect(&PredictionRequest::new(Crop::Tomato, "/nope/leaf.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "IMAGE_UNREADABLE");
    }

    #[tokio::test]
    async fn test_health_reports_all_models() {
        let detector = MockDetector::default();
        let health = detector.check_health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.models_loaded, 3);

        let status = detector.model_status().await.unwrap();
        assert!(Crop::ALL.iter().all(|c| status.is_loaded(c.as_str())));
    }
}
