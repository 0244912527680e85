#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use tempfile::TempDir;

use foodscan::api::AppState;
use foodscan::config::{Config, DatabaseConfig};
use foodscan::db::{AnalysisStore, Database, DatabaseBackend, LibSqlBackend};
use foodscan::error::{FoodScanError, Result};
use foodscan::llm::VisionModel;
use foodscan::models::{ImagePayload, StoredAnalysis};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub const PIZZA_REPLY: &str = r#"{"food_name":"Pizza","potential_allergens":["Wheat","Dairy"],"likely_ingredients":["Dough","Cheese"],"confidence_level":"high","warnings":[]}"#;

/// Base64 for the bytes "abc".
pub const IMAGE_B64: &str = "YWJj";

enum Reply {
    Text(String),
    Unavailable,
    Upstream,
}

/// Vision model double that records every prompt it receives.
pub struct StubModel {
    reply: Reply,
    calls: AtomicUsize,
    system_prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self::new(Reply::Text(text.to_string())))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::new(Reply::Upstream))
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self::new(Reply::Unavailable))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            system_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.system_prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl VisionModel for StubModel {
    async fn analyze(&self, _image: &ImagePayload, system: &str, _user: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.system_prompts.lock().unwrap().push(system.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Upstream => Err(FoodScanError::Llm("connection reset by peer".to_string())),
            Reply::Unavailable => Err(FoodScanError::LlmUnavailable(
                "LLM_API_KEY is not set".to_string(),
            )),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.reply, Reply::Unavailable)
    }

    fn provider_name(&self) -> String {
        "stub".to_string()
    }

    fn model_name(&self) -> Option<String> {
        Some("stub-vision".to_string())
    }
}

/// Store double whose operations all fail, counting each attempt.
#[derive(Default)]
pub struct BrokenStore {
    pub finds: AtomicUsize,
    pub inserts: AtomicUsize,
}

#[async_trait]
impl AnalysisStore for BrokenStore {
    async fn find_by_allergens(&self, _: &[String], _: u32) -> Result<Vec<StoredAnalysis>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        Err(FoodScanError::Internal("store offline".to_string()))
    }

    async fn insert_analysis(&self, _: &StoredAnalysis) -> Result<String> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Err(FoodScanError::Internal("store offline".to_string()))
    }

    async fn list_recent(&self, _: u32) -> Result<Vec<StoredAnalysis>> {
        Err(FoodScanError::Internal("store offline".to_string()))
    }

    async fn count_analyses(&self) -> Result<u64> {
        Err(FoodScanError::Internal("store offline".to_string()))
    }

    async fn clear_analyses(&self) -> Result<u64> {
        Err(FoodScanError::Internal("store offline".to_string()))
    }
}

#[async_trait]
impl DatabaseBackend for BrokenStore {
    async fn sync(&self) -> Result<()> {
        Ok(())
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.database =
        DatabaseConfig::local(format!("file:{}", dir.path().join("foodscan.db").display()));
    config
}

/// A libsql store in a temp dir. Keep the `TempDir` alive for the test.
pub async fn libsql_store() -> (Arc<dyn DatabaseBackend>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let raw_db = Database::new(&test_config(&dir).database).await.unwrap();
    (Arc::new(LibSqlBackend::new(raw_db)), dir)
}

pub async fn app_state(
    model: Arc<dyn VisionModel>,
) -> (AppState, Arc<dyn DatabaseBackend>, TempDir) {
    init_test_logger();
    let (db, dir) = libsql_store().await;
    let state = AppState::new(test_config(&dir), db.clone(), model);
    (state, db, dir)
}

pub fn identify_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/identify")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
