pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, DatabaseConfig};
    use crate::error::Result;
    use crate::llm::VisionModel;
    use crate::models::ImagePayload;

    struct FixedModel;

    #[async_trait]
    impl VisionModel for FixedModel {
        async fn analyze(&self, _: &ImagePayload, _: &str, _: &str) -> Result<String> {
            Ok(r#"{"food_name":"Toast","potential_allergens":["Wheat"],"likely_ingredients":["Bread"],"confidence_level":"high","warnings":[]}"#.to_string())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn provider_name(&self) -> String {
            "fixed".to_string()
        }

        fn model_name(&self) -> Option<String> {
            Some("fixed-vision".to_string())
        }
    }

    async fn test_state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database =
            DatabaseConfig::local(format!("file:{}", dir.path().join("v1.db").display()));

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db: Arc<dyn crate::db::DatabaseBackend> =
            Arc::new(crate::db::LibSqlBackend::new(raw_db));

        (AppState::new(config, db, Arc::new(FixedModel)), dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_model_and_database() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app.oneshot(get("/api/v1/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["database"]["analyses"], 0);
        assert_eq!(json["data"]["llm"]["provider"], "fixed");
        assert_eq!(json["data"]["llm"]["model"], "fixed-vision");
    }

    #[tokio::test]
    async fn openapi_json_is_valid() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app.oneshot(get("/api/v1/openapi.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"].as_str().unwrap_or_default();
        assert!(
            version.starts_with("3"),
            "OpenAPI version should start with 3, got: {version}"
        );
        assert!(json["paths"]["/api/v1/identify"].is_object());
    }

    #[tokio::test]
    async fn success_envelope_has_data_no_error() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app.oneshot(get("/api/v1/allergens")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.get("data").is_some(), "success should have 'data' key");
        assert!(
            json.get("error").is_none(),
            "success should NOT have 'error' key"
        );
        assert_eq!(json["data"]["allergens"].as_array().map(Vec::len), Some(9));
    }

    #[tokio::test]
    async fn error_envelope_has_error_no_data() {
        let (state, _dir) = test_state().await;
        let app = create_router(state);

        let response = app
            .oneshot(get("/api/v1/history?limit=abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(
            json.get("data").is_none(),
            "error response should NOT have 'data' key"
        );
        assert_eq!(json["error"]["code"], "invalid_request");
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn identify_is_served_at_both_paths() {
        let (state, _dir) = test_state().await;

        for uri in ["/identify", "/api/v1/identify"] {
            let app = create_router(state.clone());
            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(uri)
                        .header("content-type", "application/json")
                        .body(Body::from(r#"{"image_data":"YWJj"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let json = body_json(response).await;
            assert_eq!(json["food_name"], "Toast");
            assert_eq!(json["success"], true);
        }
    }
}
