//! WebAssembly module for the LeafScan front-end
//!
//! Provides client-side computation for:
//! - Normalizing prediction payloads received by the app
//! - Display labels and disease information lookup
//! - Upload metadata (filename, MIME type) for picked images

use chrono::Utc;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{catalog, normalize_auto_detection, normalize_prediction};

#[cfg(target_arch = "wasm32")]
fn log_warning(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn log_warning(_message: &str) {}

fn parse_crop(crop: &str) -> Result<Crop, String> {
    crop.parse::<Crop>().map_err(|e| e.to_string())
}

fn normalize(payload_json: &str, crop: Option<&str>) -> Result<Prediction, String> {
    let wire: WirePrediction = serde_json::from_str(payload_json)
        .map_err(|e| format!("Invalid prediction JSON: {}", e))?;
    let expected = crop.map(parse_crop).transpose()?;
    normalize_prediction(wire, expected, Utc::now()).map_err(|e| e.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize: {}", e))
}

/// Normalize a prediction payload; returns the normalized prediction as JSON
pub fn normalize_prediction_str(payload_json: &str, crop: Option<&str>) -> Result<String, String> {
    to_json(&normalize(payload_json, crop)?)
}

/// Normalize an auto-detection response and keep the most confident entry
pub fn normalize_auto_detection_str(response_json: &str) -> Result<String, String> {
    let response: AutoDetectResponse = serde_json::from_str(response_json)
        .map_err(|e| format!("Invalid auto-detection JSON: {}", e))?;
    let prediction = normalize_auto_detection(response, Utc::now()).map_err(|e| e.to_string())?;
    to_json(&prediction)
}

/// Full result screen data for a payload
pub fn diagnosis_report_str(payload_json: &str, crop: Option<&str>) -> Result<String, String> {
    let report = DiagnosisReport::build(normalize(payload_json, crop)?);
    if report.info_fallback {
        log_warning(&format!(
            "No disease entry for {} / {}",
            report.prediction.crop, report.prediction.label
        ));
    }
    to_json(&report)
}

pub fn disease_info_str(crop: &str, label: &str) -> Result<String, String> {
    to_json(catalog::disease_info(parse_crop(crop)?, label))
}

#[wasm_bindgen]
pub fn normalize_prediction_json(payload_json: &str, crop: Option<String>) -> Result<String, JsValue> {
    normalize_prediction_str(payload_json, crop.as_deref()).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn normalize_auto_detection_json(response_json: &str) -> Result<String, JsValue> {
    normalize_auto_detection_str(response_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn diagnosis_report_json(payload_json: &str, crop: Option<String>) -> Result<String, JsValue> {
    diagnosis_report_str(payload_json, crop.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Disease information for a crop and machine or display label
#[wasm_bindgen]
pub fn disease_info_json(crop: &str, label: &str) -> Result<String, JsValue> {
    disease_info_str(crop, label).map_err(|e| JsValue::from_str(&e))
}

/// Display label for a machine class label
#[wasm_bindgen]
pub fn format_label(raw: &str) -> String {
    catalog::format_disease_label(raw)
}

#[wasm_bindgen]
pub fn is_supported_crop(crop: &str) -> bool {
    parse_crop(crop).is_ok()
}

/// Machine names of the supported crops
#[wasm_bindgen]
pub fn supported_crops() -> js_sys::Array {
    Crop::ALL
        .iter()
        .map(|crop| JsValue::from_str(crop.as_str()))
        .collect()
}

/// MIME type the upload will declare for an image URI
#[wasm_bindgen]
pub fn image_mime_type(uri: &str) -> String {
    ImageRef::new(uri).format().mime_type().to_string()
}

/// Upload filename for an image URI, e.g. `leaf_image_maize.jpg`
#[wasm_bindgen]
pub fn upload_filename(uri: &str, crop: &str) -> String {
    ImageRef::new(uri).upload_filename(crop)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIZE: &str = r#"{"crop_type":"maize","predicted_disease":"blight","confidence":0.942,
        "all_probabilities":{"blight":0.942,"common_rust":0.031,"gray_leaf_spot":0.018,"healthy":0.009}}"#;

    #[test]
    fn test_normalize_prediction() {
        let json = normalize_prediction_str(MAIZE, Some("maize")).unwrap();
        let prediction: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(prediction["predicted_label"], "Corn Leaf Blight");
        assert_eq!(prediction["confidence"], 94.2);
        assert_eq!(prediction["all_probabilities"]["Healthy"], 0.9);
    }

    #[test]
    fn test_normalize_rejects_wrong_crop() {
        let err = normalize_prediction_str(MAIZE, Some("tomato")).unwrap_err();
        assert!(err.contains("tomato"));
        assert!(normalize_prediction_str(MAIZE, Some("wheat")).is_err());
        assert!(normalize_prediction_str("{", None).is_err());
    }

    #[test]
    fn test_auto_detection() {
        let response = format!(
            r#"{{"results":{{"maize":{},"tomato":{{"error":"Model not loaded"}}}}}}"#,
            MAIZE
        );
        let json = normalize_auto_detection_str(&response).unwrap();
        assert!(json.contains("\"crop_type\":\"maize\""));
    }

    #[test]
    fn test_report_flags_predicted_row() {
        let json = diagnosis_report_str(MAIZE, None).unwrap();
        let report: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(report["ranked"][0]["label"], "Corn Leaf Blight");
        assert_eq!(report["ranked"][0]["predicted"], true);
        assert_eq!(report["info_fallback"], false);
    }

    #[test]
    fn test_disease_info() {
        let json = disease_info_str("tomato", "late_blight").unwrap();
        let info: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(info["severity"], "Critical");
        assert!(disease_info_str("wheat", "rust").is_err());
    }

    #[test]
    fn test_labels_and_upload_metadata() {
        assert_eq!(format_label("gray_leaf_spot"), "Gray Leaf Spot");
        assert!(is_supported_crop("Cassava"));
        assert!(!is_supported_crop("wheat"));
        assert_eq!(image_mime_type("file:///leaf.webp"), "image/webp");
        assert_eq!(image_mime_type("file:///leaf"), "image/jpeg");
        assert_eq!(upload_filename("file:///leaf.png", "tomato"), "leaf_image_tomato.png");
    }
}
