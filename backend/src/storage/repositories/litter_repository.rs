use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use std::collections::HashMap;

use super::image_release_repository::queue_images;
use super::puppy_repository::{puppy_from_row, PUPPY_COLUMNS};
use crate::domain::models::litter::{DomainLitter, LitterWithPuppies, ParentRef};
use crate::domain::models::puppy::DomainPuppy;
use crate::storage::columns::{decode_date, decode_timestamp, encode_date, encode_timestamp};
use crate::storage::connection::DbConnection;
use crate::storage::traits::{CascadeRemoval, LitterStorage};

/// Litter columns with parent display names resolved from the member table,
/// falling back to the external name
const LITTER_SELECT: &str = r#"
    SELECT l.id, l.name, l.mother_id, l.external_mother_name, l.father_id, l.external_father_name,
           COALESCE(m.name, l.external_mother_name, 'Unknown') AS mother_name,
           COALESCE(f.name, l.external_father_name, 'Unknown') AS father_name,
           l.birth_date, l.available_date, l.profile_image, l.created_at, l.updated_at
    FROM litters l
    LEFT JOIN grumble_members m ON m.id = l.mother_id
    LEFT JOIN grumble_members f ON f.id = l.father_id
"#;

fn litter_from_row(row: &SqliteRow) -> Result<DomainLitter> {
    Ok(DomainLitter {
        id: row.get("id"),
        name: row.get("name"),
        mother: ParentRef {
            member_id: row.get("mother_id"),
            external_name: row.get("external_mother_name"),
            display_name: row.get("mother_name"),
        },
        father: ParentRef {
            member_id: row.get("father_id"),
            external_name: row.get("external_father_name"),
            display_name: row.get("father_name"),
        },
        birth_date: decode_date(row.get("birth_date"))?,
        available_date: decode_date(row.get("available_date"))?,
        profile_image: row.get("profile_image"),
        created_at: decode_timestamp(row.get("created_at"))?,
        updated_at: decode_timestamp(row.get("updated_at"))?,
    })
}

async fn puppies_for(conn: &mut SqliteConnection, litter_id: &str) -> Result<Vec<DomainPuppy>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM puppies WHERE litter_id = ? ORDER BY rowid ASC",
        PUPPY_COLUMNS
    ))
    .bind(litter_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(puppy_from_row).collect()
}

/// Repository for litters and the litter side of the cascade
#[derive(Clone)]
pub struct LitterRepository {
    db: DbConnection,
}

impl LitterRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LitterStorage for LitterRepository {
    async fn store_litter(&self, litter: &DomainLitter) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO litters (id, name, mother_id, external_mother_name, father_id,
                                 external_father_name, birth_date, available_date,
                                 profile_image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&litter.id)
        .bind(&litter.name)
        .bind(&litter.mother.member_id)
        .bind(&litter.mother.external_name)
        .bind(&litter.father.member_id)
        .bind(&litter.father.external_name)
        .bind(encode_date(&litter.birth_date))
        .bind(encode_date(&litter.available_date))
        .bind(&litter.profile_image)
        .bind(encode_timestamp(&litter.created_at))
        .bind(encode_timestamp(&litter.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_litter(&self, litter_id: &str) -> Result<Option<LitterWithPuppies>> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(&format!("{} WHERE l.id = ?", LITTER_SELECT))
            .bind(litter_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let litter = litter_from_row(&row)?;
        let puppies = puppies_for(&mut *tx, litter_id).await?;

        tx.commit().await?;
        Ok(Some(LitterWithPuppies { litter, puppies }))
    }

    async fn list_litters(&self) -> Result<Vec<LitterWithPuppies>> {
        let mut tx = self.db.pool().begin().await?;

        let litter_rows = sqlx::query(&format!(
            "{} ORDER BY l.created_at DESC, l.rowid DESC",
            LITTER_SELECT
        ))
        .fetch_all(&mut *tx)
        .await?;

        let puppy_rows = sqlx::query(&format!(
            "SELECT {} FROM puppies ORDER BY rowid ASC",
            PUPPY_COLUMNS
        ))
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut by_litter: HashMap<String, Vec<DomainPuppy>> = HashMap::new();
        for row in &puppy_rows {
            let puppy = puppy_from_row(row)?;
            by_litter.entry(puppy.litter_id.clone()).or_default().push(puppy);
        }

        litter_rows
            .iter()
            .map(|row| {
                let litter = litter_from_row(row)?;
                let puppies = by_litter.remove(&litter.id).unwrap_or_default();
                Ok(LitterWithPuppies { litter, puppies })
            })
            .collect()
    }

    async fn update_litter(
        &self,
        litter: &DomainLitter,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>> {
        let mut tx = self.db.pool().begin().await?;
        let updated = sqlx::query(
            r#"
            UPDATE litters
            SET name = ?, mother_id = ?, external_mother_name = ?, father_id = ?,
                external_father_name = ?, birth_date = ?, available_date = ?,
                profile_image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&litter.name)
        .bind(&litter.mother.member_id)
        .bind(&litter.mother.external_name)
        .bind(&litter.father.member_id)
        .bind(&litter.father.external_name)
        .bind(encode_date(&litter.birth_date))
        .bind(encode_date(&litter.available_date))
        .bind(&litter.profile_image)
        .bind(encode_timestamp(&litter.updated_at))
        .bind(&litter.id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let queued = match replaced_image {
            Some(old) => queue_images(&mut *tx, &[old.to_string()], "litter").await?,
            None => Vec::new(),
        };
        tx.commit().await?;
        Ok(Some(queued))
    }

    async fn delete_litter(&self, litter_id: &str) -> Result<Option<CascadeRemoval>> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query("SELECT profile_image FROM litters WHERE id = ?")
            .bind(litter_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut images: Vec<String> = vec![row.get("profile_image")];
        let puppy_images = sqlx::query("SELECT profile_image FROM puppies WHERE litter_id = ?")
            .bind(litter_id)
            .fetch_all(&mut *tx)
            .await?;
        images.extend(puppy_images.iter().map(|r| r.get::<String, _>("profile_image")));

        let deleted = sqlx::query("DELETE FROM puppies WHERE litter_id = ?")
            .bind(litter_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM litters WHERE id = ?")
            .bind(litter_id)
            .execute(&mut *tx)
            .await?;

        let queued_images = queue_images(&mut *tx, &images, "litter").await?;
        tx.commit().await?;

        Ok(Some(CascadeRemoval {
            deleted_puppies: deleted.rows_affected() as usize,
            queued_images,
        }))
    }
}
