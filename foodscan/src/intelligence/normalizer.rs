use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::{AnalysisResult, ConfidenceLevel, UNKNOWN_FOOD};

// Opening fence with optional language tag, lazily captured body, optional closing fence.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+.-]*[^\S\n]*\n?(.*?)(?:```)?\s*\z")
        .expect("code fence pattern is valid")
});

/// Remove a surrounding markdown code fence, if any, and trim whitespace.
///
/// ```
/// use foodscan::intelligence::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
/// assert_eq!(strip_code_fence("  {}  "), "{}");
/// ```
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim())
        .unwrap_or(trimmed)
}

/// Turn a raw model reply into a fully populated [`AnalysisResult`].
///
/// Never fails. A reply that is not a JSON object yields
/// [`AnalysisResult::degraded`]; otherwise every field falls back to its
/// default when missing or mistyped and the result is marked successful.
pub fn normalize_response(raw: &str) -> AnalysisResult {
    let stripped = strip_code_fence(raw);

    let fields = match serde_json::from_str::<Value>(stripped) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            tracing::warn!(
                kind = json_kind(&other),
                preview = %preview(stripped),
                "Model reply was JSON but not an object"
            );
            return AnalysisResult::degraded();
        }
        Err(e) => {
            tracing::warn!(error = %e, preview = %preview(stripped), "Model reply was not valid JSON");
            return AnalysisResult::degraded();
        }
    };

    validate_fields(&fields)
}

fn validate_fields(fields: &Map<String, Value>) -> AnalysisResult {
    let food_name = fields
        .get("food_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_FOOD)
        .to_string();

    let confidence_level = fields
        .get("confidence_level")
        .and_then(Value::as_str)
        .and_then(|level| level.parse::<ConfidenceLevel>().ok())
        .unwrap_or_default();

    AnalysisResult {
        success: true,
        food_name,
        potential_allergens: string_list(fields.get("potential_allergens")),
        likely_ingredients: string_list(fields.get("likely_ingredients")),
        confidence_level,
        warnings: string_list(fields.get("warnings")),
    }
}

/// Lists keep their string items; a bare string counts as a one-item list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let non_blank = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(non_blank)
            .collect(),
        Some(Value::String(s)) => non_blank(s).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
