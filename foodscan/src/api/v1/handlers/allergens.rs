use crate::api::v1::dto::{AllergenCatalogResponse, AllergenOption};
use crate::api::v1::response::ApiResponse;
use crate::models::COMMON_ALLERGENS;

/// `GET /api/v1/allergens`
#[utoipa::path(
    get,
    path = "/api/v1/allergens",
    tag = "allergens",
    responses(
        (status = 200, description = "Common allergen catalog", body = AllergenCatalogResponse),
    )
)]
pub async fn list_allergens() -> ApiResponse<AllergenCatalogResponse> {
    let allergens = COMMON_ALLERGENS.iter().map(AllergenOption::from).collect();
    ApiResponse::success(AllergenCatalogResponse { allergens })
}
