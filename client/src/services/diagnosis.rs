//! Scan workflow: upload, normalize, look up, optionally keep

use shared::{DiagnosisReport, ImageRef, PredictionRequest, SavedResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::favorites::FavoritesService;
use crate::error::AppResult;
use crate::external::{cancellable, DiseaseDetector};

/// Diagnosis service tying the detector to the favorites store
#[derive(Clone)]
pub struct DiagnosisService {
    detector: Arc<dyn DiseaseDetector>,
    favorites: FavoritesService,
}

impl DiagnosisService {
    pub fn new(detector: Arc<dyn DiseaseDetector>, favorites: FavoritesService) -> Self {
        Self {
            detector,
            favorites,
        }
    }

    pub fn detector(&self) -> &Arc<dyn DiseaseDetector> {
        &self.detector
    }

    /// Diagnose a leaf with the model of the requested crop
    pub async fn diagnose(
        &self,
        request: &PredictionRequest,
        cancel: &CancellationToken,
    ) -> AppResult<DiagnosisReport> {
        tracing::info!(
            "Diagnosing {} with {} detector",
            request.image,
            self.detector.name()
        );
        let prediction = cancellable(cancel, self.detector.detect(request)).await?;
        Ok(self.report(prediction))
    }

    /// Diagnose a leaf of unknown crop
    pub async fn diagnose_auto(
        &self,
        image: &ImageRef,
        cancel: &CancellationToken,
    ) -> AppResult<DiagnosisReport> {
        let prediction = cancellable(cancel, self.detector.detect_auto(image)).await?;
        Ok(self.report(prediction))
    }

    pub async fn save(&self, report: &DiagnosisReport, image: &ImageRef) -> AppResult<SavedResult> {
        self.favorites.save(&report.prediction, image).await
    }

    fn report(&self, prediction: shared::Prediction) -> DiagnosisReport {
        let report = DiagnosisReport::build(prediction);
        if report.info_fallback {
            tracing::warn!(
                "No catalog entry for {} / {}, showing healthy record",
                report.prediction.crop,
                report.prediction.label
            );
        }
        report
    }
}
