//! Allergen catalog DTOs.

use serde::Serialize;

use crate::models::CommonAllergen;

/// A catalog allergen in the shape clients store as a preference.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AllergenOption {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    /// Always false; clients opt in per allergen.
    pub enabled: bool,
}

impl From<&CommonAllergen> for AllergenOption {
    fn from(allergen: &CommonAllergen) -> Self {
        Self {
            id: allergen.id.to_string(),
            name: allergen.name.to_string(),
            aliases: allergen.aliases.iter().map(|a| a.to_string()).collect(),
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AllergenCatalogResponse {
    pub allergens: Vec<AllergenOption>,
}
