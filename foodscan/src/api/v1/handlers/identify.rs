use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use validator::Validate;

use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::api::v1::dto::IdentifyRequest;
use crate::error::FoodScanError;
use crate::models::{AnalysisResult, ImagePayload};

pub const MISSING_IMAGE: &str = "No image data provided";

/// `POST /identify` and `POST /api/v1/identify`
///
/// Analyzes a food photo for allergens. Client mistakes are answered with
/// `{"success": false, "error": ...}`; model failures with an analysis whose
/// `food_name` is `"Error"`.
#[utoipa::path(
    post,
    path = "/api/v1/identify",
    tag = "identify",
    request_body = IdentifyRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "Missing or malformed image data"),
        (status = 429, description = "Vision model rate limited", body = AnalysisResult),
        (status = 502, description = "Vision model failed", body = AnalysisResult),
        (status = 503, description = "Vision model not configured", body = AnalysisResult),
    )
)]
pub async fn identify(
    State(state): State<AppState>,
    AppJson(req): AppJson<IdentifyRequest>,
) -> Result<Response, FoodScanError> {
    req.validate()
        .map_err(|e| FoodScanError::Validation(format!("Invalid request: {e}")))?;

    let image_data = req
        .image_data()
        .ok_or_else(|| FoodScanError::Validation(MISSING_IMAGE.to_string()))?;
    let image = ImagePayload::from_base64(image_data)?;
    let preferences = req.user_allergens.unwrap_or_default();

    match state.analysis.analyze(&image, &preferences).await {
        Ok(result) => Ok((StatusCode::OK, Json(result)).into_response()),
        Err(e) if e.is_client_error() => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "Food analysis failed");
            let status = e.status_code();
            Ok((status, Json(AnalysisResult::server_error(&e))).into_response())
        }
    }
}
