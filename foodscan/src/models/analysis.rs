use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// Name used when the model did not (or could not) identify the food.
pub const UNKNOWN_FOOD: &str = "Unknown Food";

/// Name reported when the analysis pipeline itself failed.
pub const ERROR_FOOD: &str = "Error";

/// A caller-supplied allergen toggle.
///
/// Both fields are optional on the wire; entries without a name are ignored
/// and a missing `enabled` flag counts as disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AllergenPreference {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl AllergenPreference {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: Some(name.into()),
            enabled,
        }
    }
}

/// How sure the model is about its identification
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    #[default]
    Low,
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown confidence level: {s}")),
        }
    }
}

/// Normalized outcome of one image analysis.
///
/// Every field is always populated; list fields default to empty and
/// `confidence_level` defaults to [`ConfidenceLevel::Low`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnalysisResult {
    pub success: bool,
    pub food_name: String,
    pub potential_allergens: Vec<String>,
    pub likely_ingredients: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    /// Placeholder returned when the model reply could not be understood.
    pub fn degraded() -> Self {
        Self {
            success: false,
            food_name: UNKNOWN_FOOD.to_string(),
            potential_allergens: Vec::new(),
            likely_ingredients: Vec::new(),
            confidence_level: ConfidenceLevel::Low,
            warnings: Vec::new(),
        }
    }

    /// Result reported when the model or store could not be reached.
    pub fn server_error(description: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            food_name: ERROR_FOOD.to_string(),
            potential_allergens: Vec::new(),
            likely_ingredients: Vec::new(),
            confidence_level: ConfidenceLevel::Low,
            warnings: vec![format!("Error analyzing image: {description}")],
        }
    }
}

/// A persisted analysis, as held by the retrieval store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub user_allergens: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl StoredAnalysis {
    pub fn new(result: AnalysisResult, user_allergens: Vec<String>) -> Self {
        Self {
            id: nanoid!(),
            result,
            user_allergens,
            timestamp: Utc::now(),
        }
    }

    /// No allergens were detected in the scanned food.
    pub fn is_safe(&self) -> bool {
        self.result.potential_allergens.is_empty()
    }
}
