//! Supported crops

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crop categories the inference service has models for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Cassava,
    Maize,
    Tomato,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported crop: {0} (expected one of cassava, maize, tomato)")]
pub struct UnknownCrop(pub String);

impl Crop {
    pub const ALL: [Crop; 3] = [Crop::Cassava, Crop::Maize, Crop::Tomato];

    /// Machine name used on the wire and in endpoint paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Cassava => "cassava",
            Crop::Maize => "maize",
            Crop::Tomato => "tomato",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Crop::Cassava => "Cassava",
            Crop::Maize => "Maize",
            Crop::Tomato => "Tomato",
        }
    }

    /// Class labels the crop's model emits.
    ///
    /// Older maize models emit `northern_leaf_blight` instead of `blight`;
    /// both map to the same display label.
    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            Crop::Cassava => &[
                "bacterial_blight",
                "brown_streak_disease",
                "green_mottle",
                "healthy",
                "mosaic_disease",
            ],
            Crop::Maize => &[
                "blight",
                "common_rust",
                "gray_leaf_spot",
                "healthy",
            ],
            Crop::Tomato => &[
                "bacterial_spot",
                "early_blight",
                "healthy",
                "late_blight",
                "leaf_mold",
                "mosaic_virus",
                "septoria_spot",
                "spider_mites",
                "target_spot",
                "yellow_leaf_curl_virus",
            ],
        }
    }

    pub fn knows_class(&self, label: &str) -> bool {
        self.classes().contains(&label)
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Crop {
    type Err = UnknownCrop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cassava" => Ok(Crop::Cassava),
            "maize" => Ok(Crop::Maize),
            "tomato" => Ok(Crop::Tomato),
            _ => Err(UnknownCrop(s.to_string())),
        }
    }
}
