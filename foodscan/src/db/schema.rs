use libsql::Connection;

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Successful analyses, kept as retrieval context and scan history.
        -- List columns hold JSON arrays of strings.
        CREATE TABLE IF NOT EXISTS analyses (
            id TEXT PRIMARY KEY,
            food_name TEXT NOT NULL,
            potential_allergens TEXT NOT NULL DEFAULT '[]',
            likely_ingredients TEXT NOT NULL DEFAULT '[]',
            confidence_level TEXT NOT NULL DEFAULT 'low',
            warnings TEXT NOT NULL DEFAULT '[]',
            user_allergens TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses(created_at);
        "#,
    )
    .await?;

    Ok(())
}
