//! LeafScan client library
//!
//! Talks to the plant-disease inference service, normalizes its answers
//! and keeps the user's saved results on the device.

pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult, ErrorDetail};

use std::sync::Arc;

use external::detector_from_config;
use services::{DiagnosisService, FavoritesService, LocalStore, OnboardingService};

/// Application state shared across commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub diagnosis: DiagnosisService,
    pub favorites: FavoritesService,
    pub onboarding: OnboardingService,
}

impl AppState {
    /// Wire up the detector and the local store from configuration
    pub fn new(config: Config) -> AppResult<Self> {
        let detector = detector_from_config(&config)?;
        let store = Arc::new(LocalStore::new(config.storage.path.clone()));
        let favorites = FavoritesService::new(store.clone());

        Ok(Self {
            diagnosis: DiagnosisService::new(detector, favorites.clone()),
            onboarding: OnboardingService::new(store),
            favorites,
            config: Arc::new(config),
        })
    }
}
