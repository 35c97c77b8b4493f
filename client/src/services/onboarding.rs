//! First-run onboarding flag

use serde_json::Value;
use std::sync::Arc;

use super::storage::LocalStore;
use crate::error::AppResult;

/// Store key of the onboarding flag
pub const ONBOARDING_KEY: &str = "onboardingComplete";

#[derive(Debug, Clone)]
pub struct OnboardingService {
    store: Arc<LocalStore>,
}

impl OnboardingService {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub async fn is_complete(&self) -> AppResult<bool> {
        Ok(match self.store.get(ONBOARDING_KEY).await? {
            Some(Value::String(flag)) => flag == "true",
            Some(Value::Bool(flag)) => flag,
            _ => false,
        })
    }

    pub async fn mark_complete(&self) -> AppResult<()> {
        self.store
            .set(ONBOARDING_KEY, Value::String("true".to_string()))
            .await?;
        tracing::info!("Onboarding marked complete");
        Ok(())
    }

    pub async fn reset(&self) -> AppResult<()> {
        self.store.remove(ONBOARDING_KEY).await?;
        tracing::info!("Onboarding reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(dir: &tempfile::TempDir) -> (Arc<LocalStore>, OnboardingService) {
        let store = Arc::new(LocalStore::new(dir.path().join("store.json")));
        (store.clone(), OnboardingService::new(store))
    }

    #[tokio::test]
    async fn test_flag_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let (store, onboarding) = service(&dir);

        assert!(!onboarding.is_complete().await.unwrap());
        onboarding.mark_complete().await.unwrap();
        assert!(onboarding.is_complete().await.unwrap());
        assert_eq!(store.get(ONBOARDING_KEY).await.unwrap(), Some(json!("true")));

        onboarding.reset().await.unwrap();
        assert!(!onboarding.is_complete().await.unwrap());
    }

    #[tokio::test]
    async fn test_other_values_are_not_complete() {
        let dir = tempfile::tempdir().unwrap();
        let (store, onboarding) = service(&dir);

        store.set(ONBOARDING_KEY, json!("yes")).await.unwrap();
        assert!(!onboarding.is_complete().await.unwrap());

        store.set(ONBOARDING_KEY, json!(true)).await.unwrap();
        assert!(onboarding.is_complete().await.unwrap());
    }
}
