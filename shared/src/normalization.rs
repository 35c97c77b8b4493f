//! Normalization of inference-service payloads
//!
//! Every payload passes through [`normalize_prediction`] exactly once.
//! It reconciles the two field sets in use, converts values to
//! percentages using the declared unit and rejects payloads that do not
//! describe a consistent prediction.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::catalog::format_disease_label;
use crate::models::{AutoDetectResponse, Crop, PlantStatus, Prediction, UnknownCrop, WirePrediction};
use crate::types::ConfidenceUnit;
use crate::validation::{arg_max, validate_distribution, validate_probability};

/// Why a payload could not be normalized
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NormalizationError {
    #[error("Service reported an error: {0}")]
    ServiceError(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Conflicting values for {field}: {current} vs {legacy}")]
    ConflictingField {
        field: &'static str,
        current: String,
        legacy: String,
    },

    #[error(transparent)]
    UnknownCrop(#[from] UnknownCrop),

    #[error("Expected a {expected} prediction, got {actual}")]
    CropMismatch { expected: Crop, actual: Crop },

    #[error("Invalid probabilities: {0}")]
    InvalidProbabilities(&'static str),

    #[error("Invalid confidence {value}: {reason}")]
    InvalidConfidence { value: f64, reason: &'static str },

    #[error("Predicted class {0} is missing from the probabilities")]
    LabelNotInProbabilities(String),

    #[error("Predicted class {label} is not the most likely class ({top} is)")]
    NotArgMax { label: String, top: String },

    #[error("Confidence {confidence} does not match the probability {probability} of the predicted class")]
    ConfidenceMismatch { confidence: f64, probability: f64 },

    #[error("Classes {0} map to the same display label")]
    DuplicateLabel(String),

    #[error("Status {0} contradicts the predicted class")]
    StatusMismatch(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("No valid prediction in auto-detection response")]
    NoValidPrediction,
}

/// Pick the current field when present, else the legacy one; both
/// present with different values is an error
fn reconcile(
    field: &'static str,
    current: Option<String>,
    legacy: Option<String>,
) -> Result<String, NormalizationError> {
    match (current, legacy) {
        (Some(current), Some(legacy)) if current != legacy => {
            Err(NormalizationError::ConflictingField {
                field,
                current,
                legacy,
            })
        }
        (Some(value), _) | (None, Some(value)) => Ok(value),
        (None, None) => Err(NormalizationError::MissingField(field)),
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO timestamp taken as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, NormalizationError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| NormalizationError::InvalidTimestamp(raw.to_string()))
}

/// Normalize one prediction payload.
///
/// `expected` is the crop the request was sent for; `None` for
/// auto-detection. `received_at` stamps payloads without a timestamp.
pub fn normalize_prediction(
    wire: WirePrediction,
    expected: Option<Crop>,
    received_at: DateTime<Utc>,
) -> Result<Prediction, NormalizationError> {
    if let Some(error) = wire.error {
        return Err(NormalizationError::ServiceError(error));
    }

    let crop: Crop = reconcile("crop_type", wire.crop_type, wire.plant_type)?.parse()?;
    if let Some(expected) = expected {
        if expected != crop {
            return Err(NormalizationError::CropMismatch {
                expected,
                actual: crop,
            });
        }
    }

    let disease = reconcile("predicted_disease", wire.predicted_disease, wire.predicted_class)?;
    let raw_probabilities = wire
        .all_probabilities
        .ok_or(NormalizationError::MissingField("all_probabilities"))?;
    let unit = wire.confidence_unit.unwrap_or_default();

    validate_distribution(&raw_probabilities, unit)
        .map_err(NormalizationError::InvalidProbabilities)?;

    let probability = *raw_probabilities
        .get(&disease)
        .ok_or_else(|| NormalizationError::LabelNotInProbabilities(disease.clone()))?;

    if let Some((top, top_value)) = arg_max(&raw_probabilities) {
        if probability < top_value {
            return Err(NormalizationError::NotArgMax {
                label: disease,
                top: top.to_string(),
            });
        }
    }

    let confidence = match wire.confidence {
        Some(value) => {
            validate_probability(value, unit)
                .map_err(|reason| NormalizationError::InvalidConfidence { value, reason })?;
            if (value - probability).abs() > unit.max() * 1e-3 {
                return Err(NormalizationError::ConfidenceMismatch {
                    confidence: value,
                    probability,
                });
            }
            value
        }
        None => probability,
    };

    let status = PlantStatus::from_label(&disease);
    if let Some(raw_status) = wire.status {
        if !raw_status.eq_ignore_ascii_case(&status.to_string()) {
            return Err(NormalizationError::StatusMismatch(raw_status));
        }
    }

    let mut probabilities = BTreeMap::new();
    for (class, value) in &raw_probabilities {
        let label = format_disease_label(class);
        if probabilities.insert(label.clone(), unit.to_percent(*value)).is_some() {
            return Err(NormalizationError::DuplicateLabel(label));
        }
    }

    let timestamp = match wire.timestamp.as_deref() {
        Some(raw) => parse_timestamp(raw)?,
        None => received_at,
    };

    Ok(Prediction {
        crop,
        label: format_disease_label(&disease),
        disease,
        confidence: unit.to_percent(confidence),
        probabilities,
        status,
        processing_time_ms: wire.processing_time_ms,
        timestamp,
    })
}

/// Normalize every entry of an auto-detection response and keep the most
/// confident one. Entries that carry an error or fail normalization are
/// skipped.
pub fn normalize_auto_detection(
    response: AutoDetectResponse,
    received_at: DateTime<Utc>,
) -> Result<Prediction, NormalizationError> {
    response
        .results
        .into_iter()
        .filter_map(|(key, wire)| {
            let expected = key.parse::<Crop>().ok();
            normalize_prediction(wire, expected, received_at).ok()
        })
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .ok_or(NormalizationError::NoValidPrediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    fn maize_wire() -> WirePrediction {
        serde_json::from_str(
            r#"{"crop_type":"maize","predicted_disease":"blight","confidence":0.942,
                "all_probabilities":{"blight":0.942,"common_rust":0.031,"gray_leaf_spot":0.018,"healthy":0.009},
                "status":"diseased"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_maize_blight_example() {
        let prediction = normalize_prediction(maize_wire(), Some(Crop::Maize), now()).unwrap();

        assert_eq!(prediction.crop, Crop::Maize);
        assert_eq!(prediction.disease, "blight");
        assert_eq!(prediction.label, "Corn Leaf Blight");
        assert_eq!(prediction.confidence, 94.2);
        assert_eq!(prediction.probabilities["Corn Leaf Blight"], 94.2);
        assert_eq!(prediction.probabilities["Common Rust"], 3.1);
        assert_eq!(prediction.probabilities["Gray Leaf Spot"], 1.8);
        assert_eq!(prediction.probabilities["Healthy"], 0.9);
        assert!((prediction.probability_total() - 100.0).abs() < 0.01);
        assert_eq!(prediction.status, PlantStatus::Diseased);
        assert_eq!(prediction.timestamp, now());
    }

    #[test]
    fn test_legacy_shape_normalizes_identically() {
        let legacy: WirePrediction = serde_json::from_str(
            r#"{"plant_type":"maize","predicted_class":"blight","confidence":0.942,
                "all_probabilities":{"blight":0.942,"common_rust":0.031,"gray_leaf_spot":0.018,"healthy":0.009}}"#,
        )
        .unwrap();

        let a = normalize_prediction(maize_wire(), Some(Crop::Maize), now()).unwrap();
        let b = normalize_prediction(legacy, Some(Crop::Maize), now()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_percent_unit_is_not_scaled_again() {
        let mut wire = maize_wire();
        wire.confidence = Some(94.2);
        wire.confidence_unit = Some(ConfidenceUnit::Percent);
        wire.all_probabilities = Some(BTreeMap::from([
            ("blight".to_string(), 94.2),
            ("healthy".to_string(), 5.8),
        ]));

        let prediction = normalize_prediction(wire, Some(Crop::Maize), now()).unwrap();
        assert_eq!(prediction.confidence, 94.2);
        assert_eq!(prediction.probabilities["Healthy"], 5.8);
    }

    #[test]
    fn test_percent_values_without_unit_rejected() {
        let mut wire = maize_wire();
        wire.confidence = Some(94.2);
        wire.all_probabilities = Some(BTreeMap::from([
            ("blight".to_string(), 94.2),
            ("healthy".to_string(), 5.8),
        ]));

        let err = normalize_prediction(wire, Some(Crop::Maize), now()).unwrap_err();
        assert!(matches!(err, NormalizationError::InvalidProbabilities(_)));
    }

    #[test]
    fn test_service_error_payload() {
        let wire: WirePrediction =
            serde_json::from_str(r#"{"error":"maize model not loaded","plant_type":"maize"}"#).unwrap();
        assert_eq!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::ServiceError("maize model not loaded".into()))
        );
    }

    #[test]
    fn test_conflicting_crop_fields() {
        let mut wire = maize_wire();
        wire.plant_type = Some("tomato".into());
        assert!(matches!(
            normalize_prediction(wire, None, now()),
            Err(NormalizationError::ConflictingField { field: "crop_type", .. })
        ));
    }

    #[test]
    fn test_crop_mismatch() {
        assert_eq!(
            normalize_prediction(maize_wire(), Some(Crop::Tomato), now()),
            Err(NormalizationError::CropMismatch {
                expected: Crop::Tomato,
                actual: Crop::Maize
            })
        );
    }

    #[test]
    fn test_unknown_crop() {
        let mut wire = maize_wire();
        wire.crop_type = Some("wheat".into());
        assert!(matches!(
            normalize_prediction(wire, None, now()),
            Err(NormalizationError::UnknownCrop(_))
        ));
    }

    #[test]
    fn test_label_must_be_arg_max() {
        let mut wire = maize_wire();
        wire.predicted_disease = Some("common_rust".into());
        wire.confidence = Some(0.031);
        wire.status = None;
        assert_eq!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::NotArgMax {
                label: "common_rust".into(),
                top: "blight".into()
            })
        );
    }

    #[test]
    fn test_label_must_be_in_probabilities() {
        let mut wire = maize_wire();
        wire.predicted_disease = Some("northern_leaf_blight".into());
        assert_eq!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::LabelNotInProbabilities("northern_leaf_blight".into()))
        );
    }

    #[test]
    fn test_confidence_must_match_probability() {
        let mut wire = maize_wire();
        wire.confidence = Some(0.5);
        assert!(matches!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::ConfidenceMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_confidence_taken_from_probabilities() {
        let mut wire = maize_wire();
        wire.confidence = None;
        let prediction = normalize_prediction(wire, Some(Crop::Maize), now()).unwrap();
        assert_eq!(prediction.confidence, 94.2);
    }

    #[test]
    fn test_status_mismatch() {
        let mut wire = maize_wire();
        wire.status = Some("healthy".into());
        assert_eq!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::StatusMismatch("healthy".into()))
        );
    }

    #[test]
    fn test_duplicate_display_labels() {
        let mut wire = maize_wire();
        wire.all_probabilities = Some(BTreeMap::from([
            ("blight".to_string(), 0.6),
            ("northern_leaf_blight".to_string(), 0.3),
            ("healthy".to_string(), 0.1),
        ]));
        wire.confidence = Some(0.6);
        assert_eq!(
            normalize_prediction(wire, Some(Crop::Maize), now()),
            Err(NormalizationError::DuplicateLabel("Corn Leaf Blight".into()))
        );
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(
            parse_timestamp("2024-05-01T08:30:00Z").unwrap(),
            now()
        );
        assert_eq!(
            parse_timestamp("2024-05-01T10:30:00+02:00").unwrap(),
            now()
        );
        assert_eq!(
            parse_timestamp("2024-05-01T08:30:00.000000").unwrap(),
            now()
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_auto_detection_picks_most_confident() {
        let response: AutoDetectResponse = serde_json::from_str(
            r#"{"message":"Auto-detection results for all crop types","results":{
                "cassava":{"crop_type":"cassava","predicted_disease":"healthy","confidence":0.55,
                           "all_probabilities":{"healthy":0.55,"mosaic_disease":0.45},"status":"healthy"},
                "maize":{"crop_type":"maize","predicted_disease":"common_rust","confidence":0.81,
                         "all_probabilities":{"common_rust":0.81,"healthy":0.19},"status":"diseased"},
                "tomato":{"error":"Prediction failed"}}}"#,
        )
        .unwrap();

        let best = normalize_auto_detection(response, now()).unwrap();
        assert_eq!(best.crop, Crop::Maize);
        assert_eq!(best.label, "Common Rust");
        assert_eq!(best.confidence, 81.0);
    }

    #[test]
    fn test_auto_detection_without_valid_entries() {
        let response: AutoDetectResponse =
            serde_json::from_str(r#"{"results":{"tomato":{"error":"boom"}}}"#).unwrap();
        assert_eq!(
            normalize_auto_detection(response, now()),
            Err(NormalizationError::NoValidPrediction)
        );
    }
}
