//! Saved (favorite) prediction results

use chrono::Utc;
use serde_json::Value;
use shared::{Crop, ImageRef, Prediction, SavedResult};
use std::sync::Arc;
use uuid::Uuid;

use super::storage::LocalStore;
use crate::error::{AppError, AppResult};

/// Store key holding the list of saved results
pub const SAVED_RESULTS_KEY: &str = "savedResults";

/// Favorites service over the local store
#[derive(Debug, Clone)]
pub struct FavoritesService {
    store: Arc<LocalStore>,
}

/// Result of pressing the save button
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SavedResult),
    Removed(SavedResult),
}

/// Raw entries under the key. Anything that is not a list reads as empty.
fn raw_entries(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!("Ignoring non-list saved results: {}", other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn parse(entry: &Value) -> Option<SavedResult> {
    serde_json::from_value(entry.clone()).ok()
}

fn to_value(entries: Vec<Value>) -> AppResult<Value> {
    serde_json::to_value(entries)
        .map_err(|e| AppError::StorageError(format!("Failed to serialize saved results: {}", e)))
}

/// Append a new entry unless one already matches. Returns the entry and
/// whether the list changed.
fn insert_entry(
    entries: &mut Vec<Value>,
    prediction: Prediction,
    image: ImageRef,
) -> AppResult<(SavedResult, bool)> {
    if let Some(existing) = entries
        .iter()
        .filter_map(parse)
        .find(|r| r.matches(prediction.crop, &prediction.label, &image))
    {
        tracing::debug!("{} already saved as {}", prediction.label, existing.id);
        return Ok((existing, false));
    }

    let saved = SavedResult::new(prediction, image, Utc::now());
    let value = serde_json::to_value(&saved)
        .map_err(|e| AppError::StorageError(format!("Failed to serialize saved result: {}", e)))?;
    entries.push(value);

    tracing::info!("Saved {} result {}", saved.prediction.label, saved.id);
    Ok((saved, true))
}

/// Drop every entry matching the tuple; returns the first one removed
fn remove_matching(
    entries: &mut Vec<Value>,
    crop: Crop,
    label: &str,
    image: &ImageRef,
) -> Option<SavedResult> {
    let mut removed = None;
    entries.retain(|entry| match parse(entry) {
        Some(r) if r.matches(crop, label, image) => {
            removed.get_or_insert(r);
            false
        }
        _ => true,
    });

    if let Some(r) = &removed {
        tracing::info!("Unsaved {} result {}", label, r.id);
    }
    removed
}

impl FavoritesService {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// All saved results, newest first. Malformed entries are skipped.
    pub async fn list(&self) -> AppResult<Vec<SavedResult>> {
        let entries = raw_entries(self.store.get(SAVED_RESULTS_KEY).await?);
        let total = entries.len();

        let mut results: Vec<SavedResult> = entries.iter().filter_map(parse).collect();
        if results.len() < total {
            tracing::warn!(
                "Skipped {} malformed saved result(s)",
                total - results.len()
            );
        }

        results.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(results)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SavedResult> {
        self.list()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }

    pub async fn is_saved(&self, prediction: &Prediction, image: &ImageRef) -> AppResult<bool> {
        Ok(self
            .list()
            .await?
            .iter()
            .any(|r| r.matches(prediction.crop, &prediction.label, image)))
    }

    /// Save a prediction. Saving an already saved (crop, label, image)
    /// returns the existing entry.
    pub async fn save(&self, prediction: &Prediction, image: &ImageRef) -> AppResult<SavedResult> {
        let prediction = prediction.clone();
        let image = image.clone();

        self.store
            .update(SAVED_RESULTS_KEY, move |current| {
                let mut entries = raw_entries(current);
                let (saved, changed) = insert_entry(&mut entries, prediction, image)?;
                let value = if changed { Some(to_value(entries)?) } else { None };
                Ok((value, saved))
            })
            .await
    }

    /// Remove a saved result by id
    pub async fn remove(&self, id: Uuid) -> AppResult<SavedResult> {
        self.store
            .update(SAVED_RESULTS_KEY, move |current| {
                let mut entries = raw_entries(current);
                let position = entries
                    .iter()
                    .position(|e| parse(e).is_some_and(|r| r.id == id))
                    .ok_or_else(|| AppError::NotFound(id.to_string()))?;

                let removed = entries.remove(position);
                let removed = parse(&removed).ok_or_else(|| AppError::NotFound(id.to_string()))?;

                tracing::info!("Removed saved result {}", id);
                Ok((Some(to_value(entries)?), removed))
            })
            .await
    }

    /// Remove every entry matching (crop, label, image). Returns the first
    /// removed entry, if any.
    pub async fn unsave(
        &self,
        prediction: &Prediction,
        image: &ImageRef,
    ) -> AppResult<Option<SavedResult>> {
        let (crop, label, image) = (prediction.crop, prediction.label.clone(), image.clone());

        self.store
            .update(SAVED_RESULTS_KEY, move |current| {
                let mut entries = raw_entries(current);
                match remove_matching(&mut entries, crop, &label, &image) {
                    Some(r) => Ok((Some(to_value(entries)?), Some(r))),
                    None => Ok((None, None)),
                }
            })
            .await
    }

    /// Save if not saved yet, otherwise unsave
    pub async fn toggle(&self, prediction: &Prediction, image: &ImageRef) -> AppResult<SaveOutcome> {
        let prediction = prediction.clone();
        let image = image.clone();

        self.store
            .update(SAVED_RESULTS_KEY, move |current| {
                let mut entries = raw_entries(current);
                let outcome = match remove_matching(
                    &mut entries,
                    prediction.crop,
                    &prediction.label,
                    &image,
                ) {
                    Some(removed) => SaveOutcome::Removed(removed),
                    None => SaveOutcome::Saved(insert_entry(&mut entries, prediction, image)?.0),
                };
                Ok((Some(to_value(entries)?), outcome))
            })
            .await
    }

    /// Case-insensitive search over crop name and disease label
    pub async fn search(&self, query: &str) -> AppResult<Vec<SavedResult>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.matches_query(query))
            .collect())
    }

    /// Results for one crop
    pub async fn by_crop(&self, crop: Crop) -> AppResult<Vec<SavedResult>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|r| r.prediction.crop == crop)
            .collect())
    }

    /// Drop every saved result; returns how many there were
    pub async fn clear(&self) -> AppResult<usize> {
        let count = self.list().await?.len();
        self.store.remove(SAVED_RESULTS_KEY).await?;
        tracing::info!("Cleared {} saved result(s)", count);
        Ok(count)
    }
}
