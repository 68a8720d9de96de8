use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::waitlist::{DomainWaitlistEntry, PhoneNumber};
use crate::storage::columns::{decode_enum, decode_timestamp, encode_timestamp};
use crate::storage::connection::DbConnection;
use crate::storage::traits::{WaitlistInsert, WaitlistStorage};

const ENTRY_COLUMNS: &str = "seq, id, name, phone_digits, gender_preference, color_preference, \
     status, notes, submitted_at";

fn entry_from_row(row: &SqliteRow) -> Result<DomainWaitlistEntry> {
    Ok(DomainWaitlistEntry {
        id: row.get("id"),
        seq: row.get("seq"),
        name: row.get("name"),
        phone: PhoneNumber::from_normalized(row.get("phone_digits")),
        gender_preference: decode_enum(row.get("gender_preference"))?,
        color_preference: decode_enum(row.get("color_preference"))?,
        status: decode_enum(row.get("status"))?,
        notes: row.get("notes"),
        submitted_at: decode_timestamp(row.get("submitted_at"))?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Repository for waitlist entries
#[derive(Clone)]
pub struct WaitlistRepository {
    db: DbConnection,
}

impl WaitlistRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WaitlistStorage for WaitlistRepository {
    async fn insert_entry(&self, entry: &DomainWaitlistEntry) -> Result<WaitlistInsert> {
        // One autocommit statement: the UNIQUE constraint decides between racing submissions
        let result = sqlx::query(
            r#"
            INSERT INTO waitlist_entries (id, name, phone_digits, gender_preference,
                                          color_preference, status, notes, submitted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(entry.phone.digits())
        .bind(entry.gender_preference.as_str())
        .bind(entry.color_preference.as_str())
        .bind(entry.status.as_str())
        .bind(&entry.notes)
        .bind(encode_timestamp(&entry.submitted_at))
        .execute(self.db.pool())
        .await;

        match result {
            Ok(result) => Ok(WaitlistInsert::Inserted(DomainWaitlistEntry {
                seq: result.last_insert_rowid(),
                ..entry.clone()
            })),
            Err(e) if is_unique_violation(&e) => Ok(WaitlistInsert::Duplicate),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_entry(&self, entry_id: &str) -> Result<Option<DomainWaitlistEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM waitlist_entries WHERE id = ?",
            ENTRY_COLUMNS
        ))
        .bind(entry_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn list_entries(&self) -> Result<Vec<DomainWaitlistEntry>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM waitlist_entries
            ORDER BY CASE gender_preference WHEN 'male' THEN 0 ELSE 1 END,
                     submitted_at ASC, seq ASC
            "#,
            ENTRY_COLUMNS
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn update_entry(&self, entry: &DomainWaitlistEntry) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE waitlist_entries
            SET status = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.status.as_str())
        .bind(&entry.notes)
        .bind(&entry.id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_entry(&self, entry_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM waitlist_entries WHERE id = ?")
            .bind(entry_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
