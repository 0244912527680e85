use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foodscan API",
        version = "1.0.0",
        description = "Food photo allergen analysis backed by a vision model.",
    ),
    paths(
        handlers::health::health_check,
        handlers::identify::identify,
        handlers::history::list_history,
        handlers::history::clear_history,
        handlers::allergens::list_allergens,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Identify
        dto::identify::IdentifyRequest,
        models::AllergenPreference,
        models::AnalysisResult,
        models::ConfidenceLevel,
        // History
        dto::history::HistoryItem,
        dto::history::HistoryResponse,
        dto::history::ClearHistoryResponse,
        // Allergens
        dto::allergens::AllergenOption,
        dto::allergens::AllergenCatalogResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "identify", description = "Food image allergen analysis"),
        (name = "history", description = "Stored analyses"),
        (name = "allergens", description = "Common allergen catalog"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
