//! Service liveness and model metadata

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub models_loaded: u32,
    #[serde(default)]
    pub available_crops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Answer of `GET /models/status`: free-form metadata per crop model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ModelStatus(pub BTreeMap<String, serde_json::Value>);

impl ModelStatus {
    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether the service reports the crop's model as loaded
    pub fn is_loaded(&self, crop: &str) -> bool {
        self.0
            .get(crop)
            .and_then(|info| info.get("loaded").or_else(|| info.get("is_loaded")))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_health_payload() {
        let health: HealthReport =
            serde_json::from_str(r#"{"status":"healthy","models_loaded":3,"available_crops":["maize"]}"#)
                .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.models_loaded, 3);
        assert!(health.version.is_none());
    }

    #[test]
    fn test_model_status_loaded_flags() {
        let status: ModelStatus = serde_json::from_str(
            r#"{"cassava":{"loaded":true,"classes":5},"maize":{"is_loaded":false},"tomato":{}}"#,
        )
        .unwrap();
        assert!(status.is_loaded("cassava"));
        assert!(!status.is_loaded("maize"));
        assert!(!status.is_loaded("tomato"));
        assert_eq!(status.crops().count(), 3);
    }
}
