use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqliteConnection};
use tracing::debug;

use crate::domain::models::is_placeholder_image;
use crate::storage::columns::encode_timestamp;
use crate::storage::connection::DbConnection;
use crate::storage::traits::ImageReleaseStorage;

/// True while any litter, puppy or grumble member row still points at `key`
async fn still_referenced(conn: &mut SqliteConnection, key: &str) -> Result<bool> {
    let row = sqlx::query(
        r#"
        SELECT EXISTS (SELECT 1 FROM litters WHERE profile_image = ?1)
            OR EXISTS (SELECT 1 FROM puppies WHERE profile_image = ?1)
            OR EXISTS (SELECT 1 FROM grumble_members WHERE profile_image = ?1) AS referenced
        "#,
    )
    .bind(key)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row.get::<bool, _>("referenced"))
}

/// Record `keys` for release on the caller's open transaction. Must run after
/// the rows that dropped the keys were updated or deleted. Placeholders, blank
/// keys and keys another row still references are skipped; the keys actually
/// queued are returned.
pub(crate) async fn queue_images(
    conn: &mut SqliteConnection,
    keys: &[String],
    source: &str,
) -> Result<Vec<String>> {
    let queued_at = encode_timestamp(&Utc::now());
    let mut queued = Vec::new();
    for key in keys {
        let key = key.trim();
        if key.is_empty() || is_placeholder_image(key) || queued.iter().any(|k| k == key) {
            continue;
        }
        if still_referenced(&mut *conn, key).await? {
            debug!("Image {} is still referenced, not releasing", key);
            continue;
        }
        sqlx::query(
            r#"
            INSERT INTO image_release_queue (image_key, source, queued_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(key)
        .bind(source)
        .bind(&queued_at)
        .execute(&mut *conn)
        .await?;
        queued.push(key.to_string());
    }
    Ok(queued)
}

/// Repository over the queue of image blobs awaiting release
#[derive(Clone)]
pub struct ImageReleaseRepository {
    db: DbConnection,
}

impl ImageReleaseRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImageReleaseStorage for ImageReleaseRepository {
    async fn pending_keys(&self) -> Result<Vec<String>> {
        // A key picked up again by a row since it was queued is no longer an orphan
        let dropped = sqlx::query(
            r#"
            DELETE FROM image_release_queue
            WHERE image_key IN (SELECT profile_image FROM litters)
               OR image_key IN (SELECT profile_image FROM puppies)
               OR image_key IN (SELECT profile_image FROM grumble_members)
            "#,
        )
        .execute(self.db.pool())
        .await?;
        if dropped.rows_affected() > 0 {
            debug!("Dropped {} queued image(s) that are referenced again", dropped.rows_affected());
        }

        let rows = sqlx::query(
            r#"
            SELECT image_key, MIN(id) AS first_id
            FROM image_release_queue
            GROUP BY image_key
            ORDER BY first_id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|row| row.get("image_key")).collect())
    }

    async fn mark_released(&self, image_key: &str) -> Result<()> {
        sqlx::query("DELETE FROM image_release_queue WHERE image_key = ?")
            .bind(image_key)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }
}
