//! Prediction models: the wire payload and its normalized form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Crop;
use crate::types::ConfidenceUnit;

/// Prediction payload as sent by the inference service.
///
/// Two service generations are in the field: the current one sends
/// `crop_type` / `predicted_disease`, the legacy one `plant_type` /
/// `predicted_class`. Both are accepted here and reconciled in
/// [`crate::normalization::normalize_prediction`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WirePrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_disease: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_unit: Option<ConfidenceUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_probabilities: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Set by the legacy service when it answers 200 with a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of the auto-detection endpoint: one entry per crop model
#[derive(Debug, Clone, Deserialize)]
pub struct AutoDetectResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub results: BTreeMap<String, WirePrediction>,
}

/// Plant status derived from the predicted class
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlantStatus {
    Healthy,
    Diseased,
}

impl PlantStatus {
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("healthy") {
            PlantStatus::Healthy
        } else {
            PlantStatus::Diseased
        }
    }
}

impl std::fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlantStatus::Healthy => write!(f, "healthy"),
            PlantStatus::Diseased => write!(f, "diseased"),
        }
    }
}

/// Normalized prediction, the only shape the rest of the client sees.
///
/// `confidence` and every value of `probabilities` are percentages
/// (0-100, two decimals). Probabilities are keyed by display label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    #[serde(rename = "crop_type")]
    pub crop: Crop,
    /// Machine class label, e.g. `gray_leaf_spot`
    #[serde(rename = "predicted_disease")]
    pub disease: String,
    /// Display label, e.g. `Gray Leaf Spot`
    #[serde(rename = "predicted_label")]
    pub label: String,
    pub confidence: f64,
    #[serde(rename = "all_probabilities")]
    pub probabilities: BTreeMap<String, f64>,
    pub status: PlantStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Prediction {
    pub fn is_healthy(&self) -> bool {
        self.status == PlantStatus::Healthy
    }

    /// Probabilities sorted from most to least likely
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .probabilities
            .iter()
            .map(|(label, pct)| (label.as_str(), *pct))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Sum of all probabilities; close to 100 for a softmax output
    pub fn probability_total(&self) -> f64 {
        self.probabilities.values().sum()
    }
}
