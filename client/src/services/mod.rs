//! Application services for the LeafScan client

pub mod diagnosis;
pub mod favorites;
pub mod onboarding;
pub mod storage;

pub use diagnosis::DiagnosisService;
pub use favorites::{FavoritesService, SaveOutcome, SAVED_RESULTS_KEY};
pub use onboarding::{OnboardingService, ONBOARDING_KEY};
pub use storage::LocalStore;
