//! Diagnosis report: a prediction joined with its catalog record

use serde::Serialize;

use super::{DiseaseInfo, Prediction};
use crate::catalog;

/// One row of the probability breakdown
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedProbability {
    pub label: String,
    pub percent: f64,
    pub predicted: bool,
}

/// Everything the result screen shows for one prediction
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub prediction: Prediction,
    pub ranked: Vec<RankedProbability>,
    pub info: &'static DiseaseInfo,
    /// True when the catalog had no exact entry and the crop's
    /// "Healthy" record is shown instead
    pub info_fallback: bool,
}

impl DiagnosisReport {
    pub fn build(prediction: Prediction) -> Self {
        let ranked = prediction
            .ranked()
            .into_iter()
            .map(|(label, percent)| RankedProbability {
                predicted: label == prediction.label,
                label: label.to_string(),
                percent,
            })
            .collect();

        let exact = catalog::lookup_exact(prediction.crop, &prediction.label);
        let info = exact.unwrap_or_else(|| catalog::healthy_info(prediction.crop));

        Self {
            ranked,
            info,
            info_fallback: exact.is_none(),
            prediction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crop, PlantStatus, Severity};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn prediction(crop: Crop, disease: &str, label: &str) -> Prediction {
        Prediction {
            crop,
            disease: disease.into(),
            label: label.into(),
            confidence: 70.0,
            probabilities: BTreeMap::from([(label.to_string(), 70.0), ("Healthy".to_string(), 30.0)]),
            status: PlantStatus::Diseased,
            processing_time_ms: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_report_flags_predicted_row() {
        let report = DiagnosisReport::build(prediction(Crop::Maize, "common_rust", "Common Rust"));
        assert_eq!(report.ranked.len(), 2);
        assert!(report.ranked[0].predicted);
        assert_eq!(report.ranked[0].label, "Common Rust");
        assert!(!report.ranked[1].predicted);
        assert_eq!(report.info.severity, Severity::Medium);
        assert!(!report.info_fallback);
    }

    #[test]
    fn test_report_marks_fallback() {
        let report =
            DiagnosisReport::build(prediction(Crop::Cassava, "bacterial_blight", "Bacterial Blight"));
        assert!(report.info_fallback);
        assert!(report.info.is_healthy());
    }
}
