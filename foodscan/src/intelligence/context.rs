use crate::models::StoredAnalysis;

/// Render prior analyses as prompt context.
///
/// Each record becomes a three-line block (food, allergens, warnings) and
/// blocks are separated by a blank line. The record count is bounded by the
/// caller; nothing here truncates.
pub fn format_context(records: &[StoredAnalysis]) -> String {
    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_record(record: &StoredAnalysis) -> String {
    format!(
        "Food: {}\nAllergens: {}\nWarnings: {}",
        record.result.food_name,
        record.result.potential_allergens.join(", "),
        record.result.warnings.join(", "),
    )
}
