use std::collections::HashSet;

use crate::models::AllergenPreference;

/// Text rendered into prompts when the caller has no active allergens.
pub const NO_ALLERGENS: &str = "none specified";

/// Reduce caller preferences to the distinct, enabled allergen names.
///
/// Names are trimmed; entries that are disabled, unnamed or blank are
/// dropped. Duplicates are compared case-insensitively and the first
/// spelling wins, so input order is preserved.
pub fn enabled_allergens(preferences: &[AllergenPreference]) -> Vec<String> {
    let mut seen = HashSet::new();

    preferences
        .iter()
        .filter(|pref| pref.enabled)
        .filter_map(|pref| pref.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Render the enabled allergens for inclusion in a prompt.
pub fn render_allergen_list(allergens: &[String]) -> String {
    if allergens.is_empty() {
        NO_ALLERGENS.to_string()
    } else {
        allergens.join(", ")
    }
}
