//! Validation utilities for prediction payloads and image references

use std::collections::BTreeMap;

use crate::types::{ConfidenceUnit, ImageRef};

/// Tolerated overshoot of a probability distribution's total
const DISTRIBUTION_TOLERANCE: f64 = 0.05;

// ============================================================================
// Prediction Validations
// ============================================================================

/// Validate a single confidence or probability value in the given unit
pub fn validate_probability(value: f64, unit: ConfidenceUnit) -> Result<(), &'static str> {
    if !value.is_finite() {
        return Err("Probability must be a finite number");
    }
    if value < 0.0 {
        return Err("Probability cannot be negative");
    }
    if value > unit.max() {
        return match unit {
            ConfidenceUnit::Fraction => Err("Probability exceeds 1.0 for a fraction payload"),
            ConfidenceUnit::Percent => Err("Probability exceeds 100 for a percent payload"),
        };
    }
    Ok(())
}

/// Validate that a class distribution is non-empty, in range and does not
/// add up to noticeably more than 100%
pub fn validate_distribution(
    probabilities: &BTreeMap<String, f64>,
    unit: ConfidenceUnit,
) -> Result<(), &'static str> {
    if probabilities.is_empty() {
        return Err("Probability distribution is empty");
    }
    for value in probabilities.values() {
        validate_probability(*value, unit)?;
    }
    let total: f64 = probabilities.values().sum();
    if total > unit.max() * (1.0 + DISTRIBUTION_TOLERANCE) {
        return Err("Probabilities add up to more than 100%");
    }
    Ok(())
}

/// Label with the highest probability; ties resolve to the smallest label
pub fn arg_max(probabilities: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    probabilities
        .iter()
        .fold(None, |best: Option<(&str, f64)>, (label, value)| match best {
            Some((_, top)) if top >= *value => best,
            _ => Some((label.as_str(), *value)),
        })
}

// ============================================================================
// Image Validations
// ============================================================================

/// Validate that an image reference points at something readable locally
pub fn validate_image_ref(image: &ImageRef) -> Result<(), &'static str> {
    if image.as_str().trim().is_empty() {
        return Err("Image reference is empty");
    }
    if image.to_path().is_none() {
        return Err("Image reference must be a file:// URI or a local path");
    }
    Ok(())
}
