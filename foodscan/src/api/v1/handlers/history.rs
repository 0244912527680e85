use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};

use crate::api::state::AppState;
use crate::api::v1::dto::{ClearHistoryResponse, HistoryItem, HistoryQuery, HistoryResponse};
use crate::api::v1::response::{ApiResponse, ErrorCode, ResponseMeta};

/// `GET /api/v1/history`
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Recent analyses, newest first", body = HistoryResponse),
        (status = 400, description = "Invalid query parameters"),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResponse<HistoryResponse> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return ApiResponse::error(ErrorCode::InvalidRequest, rejection.body_text())
        }
    };

    let limit = query.effective_limit(state.config.retrieval.history_max_limit);

    let records = match state.retrieval.history(limit).await {
        Ok(records) => records,
        Err(e) => return e.into(),
    };

    // The total is informational; a failing count should not hide the items.
    let total = state.db.count_analyses().await.ok();
    let items: Vec<HistoryItem> = records.into_iter().map(HistoryItem::from).collect();

    ApiResponse::success_with_meta(HistoryResponse { items }, ResponseMeta { total })
}

/// `DELETE /api/v1/history`
#[utoipa::path(
    delete,
    path = "/api/v1/history",
    tag = "history",
    responses(
        (status = 200, description = "History cleared", body = ClearHistoryResponse),
    )
)]
pub async fn clear_history(State(state): State<AppState>) -> ApiResponse<ClearHistoryResponse> {
    match state.retrieval.clear_history().await {
        Ok(deleted) => ApiResponse::success(ClearHistoryResponse { deleted }),
        Err(e) => e.into(),
    }
}
