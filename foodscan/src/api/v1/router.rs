use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/identify", post(handlers::identify))
        .route(
            "/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route("/allergens", get(handlers::list_allergens))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
}
