use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::intelligence::{enabled_allergens, format_context, normalize_response};
use crate::llm::{AnalysisPrompt, VisionModel};
use crate::models::{AllergenPreference, AnalysisResult, ImagePayload};
use crate::services::RetrievalService;

/// Runs one image through filter, retrieval, prompt, model and normalizer.
#[derive(Clone)]
pub struct AnalysisService {
    model: Arc<dyn VisionModel>,
    retrieval: RetrievalService,
}

impl AnalysisService {
    pub fn new(model: Arc<dyn VisionModel>, retrieval: RetrievalService) -> Self {
        Self { model, retrieval }
    }

    /// Analyze a food image for the caller's allergen preferences.
    ///
    /// Model failures are returned as errors. Unusable replies resolve to a
    /// degraded result, and only successful results are persisted.
    pub async fn analyze(
        &self,
        image: &ImagePayload,
        preferences: &[AllergenPreference],
    ) -> Result<AnalysisResult> {
        let start = Instant::now();
        let allergens = enabled_allergens(preferences);

        let prior = self.retrieval.find_similar(&allergens).await;
        let context = format_context(&prior);
        let prompt = AnalysisPrompt::build(&allergens, &context);

        tracing::debug!(
            allergens = allergens.len(),
            context_records = prior.len(),
            image_bytes = image.bytes.len(),
            mime_type = %image.mime_type,
            "Requesting food analysis"
        );

        let raw = self
            .model
            .analyze(image, &prompt.system, &prompt.user)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Vision model call failed"))?;

        let result = normalize_response(&raw);

        if result.success {
            self.retrieval.store(&result, &allergens).await;
        }

        tracing::info!(
            food_name = %result.food_name,
            success = result.success,
            confidence = %result.confidence_level,
            allergens_detected = result.potential_allergens.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Food analysis complete"
        );

        Ok(result)
    }
}
