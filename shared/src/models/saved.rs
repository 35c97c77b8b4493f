//! Saved (favorite) prediction results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Crop, Prediction};
use crate::types::ImageRef;

/// A prediction the user chose to keep
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedResult {
    /// Stable identifier assigned when the result is saved
    pub id: Uuid,
    #[serde(flatten)]
    pub prediction: Prediction,
    #[serde(rename = "image_uri")]
    pub image: ImageRef,
    pub saved_at: DateTime<Utc>,
}

impl SavedResult {
    pub fn new(prediction: Prediction, image: ImageRef, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prediction,
            image,
            saved_at,
        }
    }

    /// Approximate identity used by the save toggle: same crop, same
    /// predicted label, same image.
    pub fn matches(&self, crop: Crop, label: &str, image: &ImageRef) -> bool {
        self.prediction.crop == crop && self.prediction.label == label && &self.image == image
    }

    /// Case-insensitive match against crop name and disease label
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.prediction.crop.as_str().contains(&query)
            || self.prediction.label.to_lowercase().contains(&query)
    }
}
