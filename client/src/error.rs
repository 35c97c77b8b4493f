//! Error handling for the LeafScan client
//!
//! Every failure carries a stable code and a message that can be shown
//! to the user as is.

use serde::Serialize;
use shared::{NormalizationError, UnknownCrop};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Local resource errors
    #[error("Invalid image reference: {0}")]
    InvalidImageRef(String),

    #[error("Image unreadable: {uri}: {source}")]
    ImageUnreadable {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    // Protocol errors
    #[error("Inference service returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    // Decode / payload errors
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Unexpected prediction payload: {0}")]
    InvalidPayload(#[from] NormalizationError),

    #[error(transparent)]
    UnknownCrop(#[from] UnknownCrop),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Saved result not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Machine-readable error description for JSON output
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl AppError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidImageRef(_) => "INVALID_IMAGE_REF",
            AppError::ImageUnreadable { .. } => "IMAGE_UNREADABLE",
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::HttpStatus { status, .. } => match status {
                400 | 415 | 422 => "INVALID_IMAGE",
                404 => "ENDPOINT_NOT_FOUND",
                503 => "MODEL_UNAVAILABLE",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::InvalidPayload(_) => "INVALID_PAYLOAD",
            AppError::UnknownCrop(_) => "UNKNOWN_CROP",
            AppError::Cancelled => "CANCELLED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidImageRef(_) | AppError::ImageUnreadable { .. } => {
                "Failed to process the selected image. Please try selecting a different image."
                    .to_string()
            }
            AppError::Network(_) => {
                "Network connection failed. Please check your internet connection and try again."
                    .to_string()
            }
            AppError::Timeout(_) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            AppError::HttpStatus { status, .. } => match status {
                400 | 415 | 422 => {
                    "Invalid image format. Please try with a different image.".to_string()
                }
                404 => "API endpoint not found. Please check your connection.".to_string(),
                503 => "The disease model for this crop is not available right now. Please try again later."
                    .to_string(),
                500..=599 => "Server error occurred. Please try again later.".to_string(),
                other => format!("Server error ({}). Please try again.", other),
            },
            AppError::Decode(_) | AppError::InvalidPayload(_) => {
                "Failed to analyze the image. Please try again with a different image.".to_string()
            }
            AppError::UnknownCrop(e) => e.to_string(),
            AppError::Cancelled => "The analysis was cancelled.".to_string(),
            AppError::NotFound(id) => format!("No saved result with id {}.", id),
            AppError::StorageError(_) => {
                "Could not access saved results on this device.".to_string()
            }
            AppError::Configuration(msg) => format!("Configuration error: {}", msg),
            AppError::Internal(_) => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Only transport-level failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Timeout(_))
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code().to_string(),
            message: self.user_message(),
            status: match self {
                AppError::HttpStatus { status, .. } => Some(*status),
                _ => None,
            },
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else if e.is_decode() || e.is_body() {
            AppError::Decode(e.to_string())
        } else if e.is_connect() || e.is_request() {
            AppError::Network(e.to_string())
        } else if e.is_builder() {
            AppError::Configuration(format!("Invalid request: {}", e))
        } else {
            AppError::Internal(e.to_string())
        }
    }
}

/// Result type alias used throughout the client
pub type AppResult<T> = Result<T, AppError>;
