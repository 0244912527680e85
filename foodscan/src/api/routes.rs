use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::v1;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Base64 photos are well past axum's default body limit.
    let body_limit = DefaultBodyLimit::max(state.config.server.max_body_bytes);

    let v1 = v1::router::v1_router();

    Router::new()
        .route("/identify", post(v1::handlers::identify))
        .nest("/api/v1", v1)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
