//! Scan history DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ConfidenceLevel, StoredAnalysis};

/// Default number of history entries returned.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Query parameters for `GET /api/v1/history`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum entries to return (default 20, clamped to the configured max).
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn effective_limit(&self, max: u32) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, max.max(1))
    }
}

/// One past scan.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HistoryItem {
    pub id: String,
    pub food_name: String,
    pub potential_allergens: Vec<String>,
    pub likely_ingredients: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub warnings: Vec<String>,
    /// Allergens the caller had enabled for this scan.
    pub user_allergens: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// True when no allergens were detected.
    pub safe: bool,
}

impl From<StoredAnalysis> for HistoryItem {
    fn from(stored: StoredAnalysis) -> Self {
        let safe = stored.is_safe();
        let result = stored.result;
        Self {
            id: stored.id,
            food_name: result.food_name,
            potential_allergens: result.potential_allergens,
            likely_ingredients: result.likely_ingredients,
            confidence_level: result.confidence_level,
            warnings: result.warnings,
            user_allergens: stored.user_allergens,
            timestamp: stored.timestamp,
            safe,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HistoryResponse {
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ClearHistoryResponse {
    pub deleted: u64,
}
