use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoredAnalysis;

/// Persistence and lookup of past analyses.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Stored analyses whose detected allergens intersect `allergens`.
    ///
    /// Returns at most `limit` records; an empty `allergens` slice matches
    /// nothing. Callers must not rely on the ordering.
    async fn find_by_allergens(
        &self,
        allergens: &[String],
        limit: u32,
    ) -> Result<Vec<StoredAnalysis>>;

    /// Insert a record and return its generated id.
    async fn insert_analysis(&self, analysis: &StoredAnalysis) -> Result<String>;

    /// Most recent analyses, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredAnalysis>>;

    async fn count_analyses(&self) -> Result<u64>;

    /// Remove every stored analysis, returning how many were deleted.
    async fn clear_analyses(&self) -> Result<u64>;
}

/// A complete database backend: the analysis store plus lifecycle operations.
#[async_trait]
pub trait DatabaseBackend: AnalysisStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
