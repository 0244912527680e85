use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{AnalysisResult, ConfidenceLevel, StoredAnalysis};

const COLUMNS: &str = "id, food_name, potential_allergens, likely_ingredients, \
    confidence_level, warnings, user_allergens, created_at";

pub struct AnalysisRepository;

impl AnalysisRepository {
    pub async fn create(conn: &Connection, analysis: &StoredAnalysis) -> Result<String> {
        let result = &analysis.result;

        conn.execute(
            r#"
            INSERT INTO analyses (
                id, food_name, potential_allergens, likely_ingredients,
                confidence_level, warnings, user_allergens, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                analysis.id.clone(),
                result.food_name.clone(),
                serde_json::to_string(&result.potential_allergens)?,
                serde_json::to_string(&result.likely_ingredients)?,
                result.confidence_level.to_string(),
                serde_json::to_string(&result.warnings)?,
                serde_json::to_string(&analysis.user_allergens)?,
                format_timestamp(&analysis.timestamp),
            ],
        )
        .await?;

        Ok(analysis.id.clone())
    }

    /// Most recent analyses whose detected allergens intersect `allergens`.
    ///
    /// Case folding is ASCII-only on both sides to agree with SQLite's
    /// `lower()`, so identical tags always match. An empty filter matches
    /// nothing.
    pub async fn find_by_allergens(
        conn: &Connection,
        allergens: &[String],
        limit: u32,
    ) -> Result<Vec<StoredAnalysis>> {
        if allergens.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut placeholders = String::new();
        for i in 0..allergens.len() {
            if i > 0 {
                placeholders.push_str(", ");
            }
            placeholders.push('?');
            placeholders.push_str(&(i + 1).to_string());
        }
        let limit_param = allergens.len() + 1;

        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM analyses
            WHERE EXISTS (
                SELECT 1 FROM json_each(analyses.potential_allergens) AS detected
                WHERE lower(detected.value) IN ({placeholders})
            )
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?{limit_param}
            "#
        );

        let mut params: Vec<libsql::Value> = allergens
            .iter()
            .map(|name| libsql::Value::from(name.trim().to_ascii_lowercase()))
            .collect();
        params.push(libsql::Value::from(limit as i64));

        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_analysis(&row)?);
        }
        Ok(results)
    }

    /// Newest first.
    pub async fn list_recent(conn: &Connection, limit: u32) -> Result<Vec<StoredAnalysis>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM analyses ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        );
        let mut rows = conn.query(&sql, params![limit as i64]).await?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_analysis(&row)?);
        }
        Ok(results)
    }

    pub async fn count(conn: &Connection) -> Result<u64> {
        let mut rows = conn.query("SELECT COUNT(*) FROM analyses", ()).await?;
        let count = match rows.next().await? {
            Some(row) => row.get::<i64>(0)?,
            None => 0,
        };
        Ok(count.max(0) as u64)
    }

    pub async fn delete_all(conn: &Connection) -> Result<u64> {
        let rows_affected = conn.execute("DELETE FROM analyses", ()).await?;
        Ok(rows_affected)
    }

    fn row_to_analysis(row: &libsql::Row) -> Result<StoredAnalysis> {
        let id: String = row.get(0)?;
        let created_at: String = row.get(7)?;
        let timestamp = match DateTime::parse_from_rfc3339(&created_at) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(e) => {
                tracing::warn!(
                    id = %id,
                    created_at = %created_at,
                    error = %e,
                    "Unparsable analysis timestamp, using current time"
                );
                Utc::now()
            }
        };

        let confidence_level = row
            .get::<String>(4)?
            .parse()
            .unwrap_or(ConfidenceLevel::Low);

        Ok(StoredAnalysis {
            id,
            result: AnalysisResult {
                success: true,
                food_name: row.get(1)?,
                potential_allergens: serde_json::from_str(&row.get::<String>(2)?)
                    .unwrap_or_default(),
                likely_ingredients: serde_json::from_str(&row.get::<String>(3)?)
                    .unwrap_or_default(),
                confidence_level,
                warnings: serde_json::from_str(&row.get::<String>(5)?).unwrap_or_default(),
            },
            user_allergens: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            timestamp,
        })
    }
}

// Fixed precision keeps the text column sortable.
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
