//! Prompt templates for food image analysis
//!
//! Templates use plain `format!()` interpolation so a missing variable is a
//! compile-time error rather than a runtime surprise.

use crate::intelligence::render_allergen_list;

/// Keys the model must return, in the order they appear in the reply.
pub const RESPONSE_KEYS: [&str; 5] = [
    "food_name",
    "potential_allergens",
    "likely_ingredients",
    "confidence_level",
    "warnings",
];

/// The user instruction that accompanies the image.
pub const USER_PROMPT: &str = "Please analyze this food image and identify the food. \
Provide the food name, potential allergens, likely ingredients, your confidence level, \
and any warnings relevant to the allergens listed in your instructions.";

/// System and user text for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub system: String,
    pub user: String,
}

impl AnalysisPrompt {
    /// Build the prompt pair for the caller's enabled allergens and any
    /// formatted prior analyses.
    ///
    /// # Example
    /// ```
    /// use foodscan::llm::prompts::AnalysisPrompt;
    ///
    /// let prompt = AnalysisPrompt::build(&["Peanut".to_string()], "");
    /// assert!(prompt.system.contains("Peanut"));
    /// assert!(prompt.system.contains("\"confidence_level\""));
    /// ```
    pub fn build(enabled_allergens: &[String], context: &str) -> Self {
        Self {
            system: analysis_system_prompt(enabled_allergens, context),
            user: USER_PROMPT.to_string(),
        }
    }
}

/// Generate the system instruction for food analysis.
///
/// The reply contract is strict: a single JSON object with exactly the keys
/// in [`RESPONSE_KEYS`] and nothing else.
pub fn analysis_system_prompt(enabled_allergens: &[String], context: &str) -> String {
    let allergens = render_allergen_list(enabled_allergens);
    let context_section = if context.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\n\nPreviously analyzed foods that share the user's allergens. Use them only as \
background; judge the current image on its own:\n{context}"
        )
    };

    format!(
        r#"You are an expert at identifying food items and their potential allergens.
Analyze the food image and provide:
1. The specific food name (be as precise as possible)
2. Allergens likely present (check for milk, eggs, peanuts, tree nuts, soy, wheat, fish, shellfish and sesame)
3. Likely ingredients based on visual inspection
4. Your confidence level in the analysis

The user is allergic to: {allergens}.
Add a warning for every one of these allergens the food may contain.{context_section}

Respond with ONLY a JSON object, without markdown fences or any other text, using exactly these keys:
{{
    "food_name": "specific name of food",
    "potential_allergens": ["allergen1", "allergen2"],
    "likely_ingredients": ["ingredient1", "ingredient2"],
    "confidence_level": "high" | "medium" | "low",
    "warnings": ["warning1", "warning2"]
}}"#
    )
}
