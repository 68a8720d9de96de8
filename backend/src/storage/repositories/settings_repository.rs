use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::traits::SettingsStorage;

/// Key/value settings persisted in the `settings` table
#[derive(Clone)]
pub struct SettingsRepository {
    db: DbConnection,
}

impl SettingsRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
