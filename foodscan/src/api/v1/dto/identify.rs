//! Identify request DTO.

use serde::Deserialize;
use validator::Validate;

use crate::models::AllergenPreference;

/// Upper bound on allergen toggles accepted per request.
pub const MAX_USER_ALLERGENS: u64 = 100;

/// Request body for `POST /identify` and `POST /api/v1/identify`.
///
/// Both fields are optional at the JSON level so that a missing image can
/// be reported with a dedicated message instead of a generic decode error.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct IdentifyRequest {
    /// Base64 image, optionally as a `data:image/...;base64,` URL.
    #[serde(default)]
    pub image_data: Option<String>,
    /// Allergen toggles; only enabled entries are considered.
    #[serde(default)]
    #[validate(length(max = MAX_USER_ALLERGENS))]
    pub user_allergens: Option<Vec<AllergenPreference>>,
}

impl IdentifyRequest {
    /// The trimmed image payload, if one was supplied.
    pub fn image_data(&self) -> Option<&str> {
        self.image_data
            .as_deref()
            .map(str::trim)
            .filter(|data| !data.is_empty())
    }
}
