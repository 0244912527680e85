use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::AnalysisRepository;
use crate::db::traits::{AnalysisStore, DatabaseBackend};
use crate::error::Result;
use crate::models::StoredAnalysis;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnalysisStore for LibSqlBackend {
    async fn find_by_allergens(
        &self,
        allergens: &[String],
        limit: u32,
    ) -> Result<Vec<StoredAnalysis>> {
        let conn = self.db.connect()?;
        AnalysisRepository::find_by_allergens(&conn, allergens, limit).await
    }
    async fn insert_analysis(&self, analysis: &StoredAnalysis) -> Result<String> {
        let conn = self.db.connect()?;
        AnalysisRepository::create(&conn, analysis).await
    }
    async fn list_recent(&self, limit: u32) -> Result<Vec<StoredAnalysis>> {
        let conn = self.db.connect()?;
        AnalysisRepository::list_recent(&conn, limit).await
    }
    async fn count_analyses(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        AnalysisRepository::count(&conn).await
    }
    async fn clear_analyses(&self) -> Result<u64> {
        let conn = self.db.connect()?;
        AnalysisRepository::delete_all(&conn).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
