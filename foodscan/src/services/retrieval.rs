use std::sync::Arc;

use crate::config::MAX_RETRIEVAL_CONTEXT;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::models::{AnalysisResult, StoredAnalysis};

/// Reads and writes past analyses for prompt grounding and history.
///
/// Failures on the analysis path are absorbed here: a failed lookup yields
/// no context and a failed write is only logged.
#[derive(Clone)]
pub struct RetrievalService {
    db: Arc<dyn DatabaseBackend>,
    context_limit: usize,
}

impl RetrievalService {
    pub fn new(db: Arc<dyn DatabaseBackend>, context_limit: usize) -> Self {
        Self {
            db,
            context_limit: context_limit.clamp(1, MAX_RETRIEVAL_CONTEXT),
        }
    }

    pub fn context_limit(&self) -> usize {
        self.context_limit
    }

    /// Prior analyses sharing at least one of `enabled_allergens`.
    pub async fn find_similar(&self, enabled_allergens: &[String]) -> Vec<StoredAnalysis> {
        if enabled_allergens.is_empty() {
            return Vec::new();
        }

        match self
            .db
            .find_by_allergens(enabled_allergens, self.context_limit as u32)
            .await
        {
            Ok(mut records) => {
                records.truncate(self.context_limit);
                tracing::debug!(count = records.len(), "Retrieved prior analyses");
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, "Retrieval lookup failed, continuing without context");
                Vec::new()
            }
        }
    }

    /// Persist a successful analysis. Returns whether the write succeeded.
    pub async fn store(&self, result: &AnalysisResult, enabled_allergens: &[String]) -> bool {
        if !result.success {
            tracing::debug!("Skipping persistence of unsuccessful analysis");
            return false;
        }

        let record = StoredAnalysis::new(result.clone(), enabled_allergens.to_vec());
        match self.db.insert_analysis(&record).await {
            Ok(id) => {
                tracing::debug!(id = %id, food_name = %result.food_name, "Stored analysis");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, food_name = %result.food_name, "Failed to store analysis");
                false
            }
        }
    }

    /// Most recent analyses, newest first.
    pub async fn history(&self, limit: u32) -> Result<Vec<StoredAnalysis>> {
        self.db.list_recent(limit).await
    }

    pub async fn clear_history(&self) -> Result<u64> {
        let deleted = self.db.clear_analyses().await?;
        tracing::info!(deleted, "Cleared analysis history");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AnalysisStore, DatabaseBackend};
    use crate::error::FoodScanError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<Vec<StoredAnalysis>>,
        fail: bool,
        find_calls: AtomicUsize,
    }

    impl MemoryStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl AnalysisStore for MemoryStore {
        async fn find_by_allergens(
            &self,
            allergens: &[String],
            limit: u32,
        ) -> Result<Vec<StoredAnalysis>> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FoodScanError::Internal("store offline".into()));
            }
            let wanted: Vec<String> = allergens.iter().map(|a| a.to_lowercase()).collect();
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.result
                        .potential_allergens
                        .iter()
                        .any(|a| wanted.contains(&a.to_lowercase()))
                })
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn insert_analysis(&self, analysis: &StoredAnalysis) -> Result<String> {
            if self.fail {
                return Err(FoodScanError::Internal("store offline".into()));
            }
            self.records.lock().unwrap().push(analysis.clone());
            Ok(analysis.id.clone())
        }

        async fn list_recent(&self, limit: u32) -> Result<Vec<StoredAnalysis>> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .rev()
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count_analyses(&self) -> Result<u64> {
            Ok(self.records.lock().unwrap().len() as u64)
        }

        async fn clear_analyses(&self) -> Result<u64> {
            let mut records = self.records.lock().unwrap();
            let count = records.len() as u64;
            records.clear();
            Ok(count)
        }
    }

    #[async_trait]
    impl DatabaseBackend for MemoryStore {
        async fn sync(&self) -> Result<()> {
            Ok(())
        }
    }

    fn success(food: &str, allergens: &[&str]) -> AnalysisResult {
        let mut result = AnalysisResult::degraded();
        result.success = true;
        result.food_name = food.to_string();
        result.potential_allergens = allergens.iter().map(|s| s.to_string()).collect();
        result
    }

    #[tokio::test]
    async fn test_empty_allergens_skip_lookup() {
        let store = Arc::new(MemoryStore::default());
        let service = RetrievalService::new(store.clone(), 5);

        assert!(service.find_similar(&[]).await.is_empty());
        assert_eq!(store.find_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_find_is_bounded() {
        let store = Arc::new(MemoryStore::default());
        let service = RetrievalService::new(store, 5);
        for i in 0..9 {
            assert!(service.store(&success(&format!("Bread {i}"), &["Wheat"]), &[]).await);
        }

        let found = service.find_similar(&["wheat".to_string()]).await;
        assert_eq!(found.len(), 5);
    }

    #[tokio::test]
    async fn test_context_limit_is_clamped() {
        let store: Arc<dyn DatabaseBackend> = Arc::new(MemoryStore::default());
        assert_eq!(RetrievalService::new(store.clone(), 50).context_limit(), 5);
        assert_eq!(RetrievalService::new(store, 0).context_limit(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_results_are_not_stored() {
        let store = Arc::new(MemoryStore::default());
        let service = RetrievalService::new(store.clone(), 5);

        assert!(!service.store(&AnalysisResult::degraded(), &[]).await);
        assert_eq!(store.count_analyses().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failures_degrade() {
        let service = RetrievalService::new(Arc::new(MemoryStore::failing()), 5);

        assert!(!service.store(&success("Pizza", &["Wheat"]), &[]).await);
        assert!(service.find_similar(&["Wheat".to_string()]).await.is_empty());
    }

    #[tokio::test]
    async fn test_store_records_enabled_allergens() {
        let store = Arc::new(MemoryStore::default());
        let service = RetrievalService::new(store.clone(), 5);

        service
            .store(&success("Satay", &["Peanut"]), &["Peanut".to_string()])
            .await;

        let history = service.history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_allergens, vec!["Peanut"]);
        assert_eq!(service.clear_history().await.unwrap(), 1);
    }
}
