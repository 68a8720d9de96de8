use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::image_release_repository::queue_images;
use crate::domain::models::puppy::DomainPuppy;
use crate::storage::columns::{decode_enum, decode_timestamp, encode_timestamp};
use crate::storage::connection::DbConnection;
use crate::storage::traits::PuppyStorage;

pub(crate) const PUPPY_COLUMNS: &str = "id, litter_id, name, color, gender, status, price, \
     description, profile_image, created_at, updated_at";

pub(crate) fn puppy_from_row(row: &SqliteRow) -> Result<DomainPuppy> {
    Ok(DomainPuppy {
        id: row.get("id"),
        litter_id: row.get("litter_id"),
        name: row.get("name"),
        color: decode_enum(row.get("color"))?,
        gender: decode_enum(row.get("gender"))?,
        status: decode_enum(row.get("status"))?,
        price: row.get("price"),
        description: row.get("description"),
        profile_image: row.get("profile_image"),
        created_at: decode_timestamp(row.get("created_at"))?,
        updated_at: decode_timestamp(row.get("updated_at"))?,
    })
}

/// Repository for puppies. Every lookup is scoped to the owning litter.
#[derive(Clone)]
pub struct PuppyRepository {
    db: DbConnection,
}

impl PuppyRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PuppyStorage for PuppyRepository {
    async fn store_puppies(&self, puppies: &[DomainPuppy]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for puppy in puppies {
            sqlx::query(
                r#"
                INSERT INTO puppies (id, litter_id, name, color, gender, status, price,
                                     description, profile_image, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&puppy.id)
            .bind(&puppy.litter_id)
            .bind(&puppy.name)
            .bind(puppy.color.as_str())
            .bind(puppy.gender.as_str())
            .bind(puppy.status.as_str())
            .bind(puppy.price)
            .bind(&puppy.description)
            .bind(&puppy.profile_image)
            .bind(encode_timestamp(&puppy.created_at))
            .bind(encode_timestamp(&puppy.updated_at))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_puppy(&self, litter_id: &str, puppy_id: &str) -> Result<Option<DomainPuppy>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM puppies WHERE id = ? AND litter_id = ?",
            PUPPY_COLUMNS
        ))
        .bind(puppy_id)
        .bind(litter_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(puppy_from_row).transpose()
    }

    async fn update_puppy(
        &self,
        puppy: &DomainPuppy,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>> {
        let mut tx = self.db.pool().begin().await?;
        let updated = sqlx::query(
            r#"
            UPDATE puppies
            SET name = ?, color = ?, gender = ?, status = ?, price = ?,
                description = ?, profile_image = ?, updated_at = ?
            WHERE id = ? AND litter_id = ?
            "#,
        )
        .bind(&puppy.name)
        .bind(puppy.color.as_str())
        .bind(puppy.gender.as_str())
        .bind(puppy.status.as_str())
        .bind(puppy.price)
        .bind(&puppy.description)
        .bind(&puppy.profile_image)
        .bind(encode_timestamp(&puppy.updated_at))
        .bind(&puppy.id)
        .bind(&puppy.litter_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let queued = match replaced_image {
            Some(old) => queue_images(&mut *tx, &[old.to_string()], "puppy").await?,
            None => Vec::new(),
        };
        tx.commit().await?;
        Ok(Some(queued))
    }

    async fn delete_puppy(&self, litter_id: &str, puppy_id: &str) -> Result<Option<Vec<String>>> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query("SELECT profile_image FROM puppies WHERE id = ? AND litter_id = ?")
            .bind(puppy_id)
            .bind(litter_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let image: String = row.get("profile_image");

        sqlx::query("DELETE FROM puppies WHERE id = ? AND litter_id = ?")
            .bind(puppy_id)
            .bind(litter_id)
            .execute(&mut *tx)
            .await?;
        let queued = queue_images(&mut *tx, &[image], "puppy").await?;

        tx.commit().await?;
        Ok(Some(queued))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::litter_repository::tests::{sample_litter, sample_puppy};
    use crate::storage::repositories::litter_repository::LitterRepository;
    use crate::storage::traits::{ImageReleaseStorage, LitterStorage};
    use crate::storage::ImageReleaseRepository;
    use shared::PuppyStatus;

    async fn setup_test() -> (PuppyRepository, LitterRepository, DbConnection) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (PuppyRepository::new(db.clone()), LitterRepository::new(db.clone()), db)
    }

    #[tokio::test]
    async fn test_store_and_get_scoped_to_litter() {
        let (puppies, litters, _) = setup_test().await;
        litters.store_litter(&sample_litter("litter::a")).await.unwrap();
        litters.store_litter(&sample_litter("litter::b")).await.unwrap();
        puppies.store_puppies(&[sample_puppy("puppy::1", "litter::a")]).await.unwrap();

        assert!(puppies.get_puppy("litter::a", "puppy::1").await.unwrap().is_some());
        assert!(puppies.get_puppy("litter::b", "puppy::1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_against_missing_litter_writes_nothing() {
        let (puppies, litters, db) = setup_test().await;
        litters.store_litter(&sample_litter("litter::a")).await.unwrap();

        let batch = vec![
            sample_puppy("puppy::1", "litter::a"),
            sample_puppy("puppy::2", "litter::missing"),
        ];
        assert!(puppies.store_puppies(&batch).await.is_err());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM puppies")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_update_queues_replaced_image() {
        let (puppies, litters, db) = setup_test().await;
        litters.store_litter(&sample_litter("litter::a")).await.unwrap();
        let mut puppy = sample_puppy("puppy::1", "litter::a");
        puppy.profile_image = "puppy-old.jpg".to_string();
        puppies.store_puppies(&[puppy.clone()]).await.unwrap();

        puppy.profile_image = "puppy-new.jpg".to_string();
        puppy.status = PuppyStatus::Sold;
        puppy.price = None;
        let queued = puppies.update_puppy(&puppy, Some("puppy-old.jpg")).await.unwrap();
        assert_eq!(queued, Some(vec!["puppy-old.jpg".to_string()]));

        let stored = puppies.get_puppy("litter::a", "puppy::1").await.unwrap().unwrap();
        assert_eq!(stored.status, PuppyStatus::Sold);
        assert_eq!(stored.price, None);
        assert_eq!(stored.profile_image, "puppy-new.jpg");

        let queue = ImageReleaseRepository::new(db);
        assert_eq!(queue.pending_keys().await.unwrap(), vec!["puppy-old.jpg"]);
    }

    #[tokio::test]
    async fn test_delete_requires_matching_litter() {
        let (puppies, litters, _) = setup_test().await;
        litters.store_litter(&sample_litter("litter::a")).await.unwrap();
        litters.store_litter(&sample_litter("litter::b")).await.unwrap();
        let mut puppy = sample_puppy("puppy::1", "litter::a");
        puppy.profile_image = "puppy-1.jpg".to_string();
        puppies.store_puppies(&[puppy]).await.unwrap();

        assert_eq!(puppies.delete_puppy("litter::b", "puppy::1").await.unwrap(), None);
        assert_eq!(
            puppies.delete_puppy("litter::a", "puppy::1").await.unwrap(),
            Some(vec!["puppy-1.jpg".to_string()])
        );
        assert!(puppies.get_puppy("litter::a", "puppy::1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_puppy_changes_nothing() {
        let (puppies, litters, db) = setup_test().await;
        litters.store_litter(&sample_litter("litter::a")).await.unwrap();
        let puppy = sample_puppy("puppy::ghost", "litter::a");

        let queued = puppies.update_puppy(&puppy, Some("puppy-old.jpg")).await.unwrap();
        assert_eq!(queued, None);

        let queue = ImageReleaseRepository::new(db);
        assert!(queue.pending_keys().await.unwrap().is_empty());
    }
}
