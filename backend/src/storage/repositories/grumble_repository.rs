use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::image_release_repository::queue_images;
use crate::config::ParentDeletePolicy;
use crate::domain::models::grumble::DomainGrumbleMember;
use crate::storage::columns::{decode_date, decode_enum, decode_timestamp, encode_date, encode_timestamp};
use crate::storage::connection::DbConnection;
use crate::storage::traits::{GrumbleStorage, MemberRemoval};

fn member_from_row(row: &SqliteRow) -> Result<DomainGrumbleMember> {
    Ok(DomainGrumbleMember {
        id: row.get("id"),
        name: row.get("name"),
        gender: decode_enum(row.get("gender"))?,
        description: row.get("description"),
        birth_date: decode_date(row.get("birth_date"))?,
        profile_image: row.get("profile_image"),
        created_at: decode_timestamp(row.get("created_at"))?,
        updated_at: decode_timestamp(row.get("updated_at"))?,
    })
}

/// Repository for grumble (breeding stock) members
#[derive(Clone)]
pub struct GrumbleRepository {
    db: DbConnection,
}

impl GrumbleRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GrumbleStorage for GrumbleRepository {
    async fn store_member(&self, member: &DomainGrumbleMember) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO grumble_members (id, name, gender, description, birth_date,
                                         profile_image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(member.gender.as_str())
        .bind(&member.description)
        .bind(encode_date(&member.birth_date))
        .bind(&member.profile_image)
        .bind(encode_timestamp(&member.created_at))
        .bind(encode_timestamp(&member.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_member(&self, member_id: &str) -> Result<Option<DomainGrumbleMember>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, gender, description, birth_date, profile_image, created_at, updated_at
            FROM grumble_members
            WHERE id = ?
            "#,
        )
        .bind(member_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(member_from_row).transpose()
    }

    async fn list_members(&self) -> Result<Vec<DomainGrumbleMember>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, gender, description, birth_date, profile_image, created_at, updated_at
            FROM grumble_members
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(member_from_row).collect()
    }

    async fn update_member(
        &self,
        member: &DomainGrumbleMember,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>> {
        let mut tx = self.db.pool().begin().await?;
        let updated = sqlx::query(
            r#"
            UPDATE grumble_members
            SET name = ?, gender = ?, description = ?, birth_date = ?,
                profile_image = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.name)
        .bind(member.gender.as_str())
        .bind(&member.description)
        .bind(encode_date(&member.birth_date))
        .bind(&member.profile_image)
        .bind(encode_timestamp(&member.updated_at))
        .bind(&member.id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let queued = match replaced_image {
            Some(old) => queue_images(&mut *tx, &[old.to_string()], "grumble").await?,
            None => Vec::new(),
        };
        tx.commit().await?;
        Ok(Some(queued))
    }

    async fn referencing_litters(&self, member_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT name FROM litters
            WHERE mother_id = ? OR father_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(member_id)
        .bind(member_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(|r| r.get("name")).collect())
    }

    async fn delete_member(
        &self,
        member: &DomainGrumbleMember,
        policy: ParentDeletePolicy,
    ) -> Result<MemberRemoval> {
        let mut tx = self.db.pool().begin().await?;

        let referencing = sqlx::query(
            r#"
            SELECT name FROM litters
            WHERE mother_id = ? OR father_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(&member.id)
        .bind(&member.id)
        .fetch_all(&mut *tx)
        .await?;
        let litters: Vec<String> = referencing.iter().map(|r| r.get("name")).collect();

        if !litters.is_empty() && policy == ParentDeletePolicy::Block {
            return Ok(MemberRemoval::Blocked { litters });
        }

        // Detach: keep the parent's name on each litter as an external name
        sqlx::query(
            r#"
            UPDATE litters SET external_mother_name = ?, mother_id = NULL
            WHERE mother_id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            r#"
            UPDATE litters SET external_father_name = ?, father_id = NULL
            WHERE father_id = ?
            "#,
        )
        .bind(&member.name)
        .bind(&member.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM grumble_members WHERE id = ?")
            .bind(&member.id)
            .execute(&mut *tx)
            .await?;
        let queued_images = queue_images(&mut *tx, &[member.profile_image.clone()], "grumble").await?;

        tx.commit().await?;
        Ok(MemberRemoval::Deleted {
            detached_litters: litters.len(),
            queued_images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::litter::ParentRef;
    use crate::storage::repositories::litter_repository::tests::sample_litter;
    use crate::storage::repositories::litter_repository::LitterRepository;
    use crate::storage::traits::LitterStorage;
    use chrono::{NaiveDate, TimeZone, Utc};
    use shared::Gender;

    fn sample_member(id: &str, name: &str, gender: Gender) -> DomainGrumbleMember {
        let created = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
        DomainGrumbleMember {
            id: id.to_string(),
            name: name.to_string(),
            gender,
            description: "Sweet and snorty".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2021, 4, 2).unwrap(),
            profile_image: format!("{id}.jpg"),
            created_at: created,
            updated_at: created,
        }
    }

    async fn setup_with_litter(mother: &DomainGrumbleMember) -> (GrumbleRepository, LitterRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let members = GrumbleRepository::new(db.clone());
        let litters = LitterRepository::new(db);
        members.store_member(mother).await.unwrap();

        let mut litter = sample_litter("litter::a");
        litter.mother = ParentRef {
            member_id: Some(mother.id.clone()),
            external_name: None,
            display_name: mother.name.clone(),
        };
        litters.store_litter(&litter).await.unwrap();
        (members, litters)
    }

    #[tokio::test]
    async fn test_block_policy_keeps_member() {
        let duchess = sample_member("grumble::1", "Duchess", Gender::Female);
        let (members, _) = setup_with_litter(&duchess).await;

        let outcome = members.delete_member(&duchess, ParentDeletePolicy::Block).await.unwrap();
        assert_eq!(
            outcome,
            MemberRemoval::Blocked { litters: vec!["Litter litter::a".to_string()] }
        );
        assert!(members.get_member("grumble::1").await.unwrap().is_some());
        assert_eq!(
            members.referencing_litters("grumble::1").await.unwrap(),
            vec!["Litter litter::a".to_string()]
        );
    }

    #[tokio::test]
    async fn test_detach_policy_copies_name_onto_litter() {
        let duchess = sample_member("grumble::1", "Duchess", Gender::Female);
        let (members, litters) = setup_with_litter(&duchess).await;

        let outcome = members.delete_member(&duchess, ParentDeletePolicy::Detach).await.unwrap();
        assert_eq!(
            outcome,
            MemberRemoval::Deleted {
                detached_litters: 1,
                queued_images: vec!["grumble::1.jpg".to_string()],
            }
        );

        let litter = litters.get_litter("litter::a").await.unwrap().unwrap().litter;
        assert_eq!(litter.mother.member_id, None);
        assert_eq!(litter.mother.external_name.as_deref(), Some("Duchess"));
        assert_eq!(litter.mother.display_name, "Duchess");
        assert!(members.get_member("grumble::1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreferenced_member_deletes_under_block() {
        let db = DbConnection::init_test().await.unwrap();
        let members = GrumbleRepository::new(db);
        let otis = sample_member("grumble::2", "Otis", Gender::Male);
        members.store_member(&otis).await.unwrap();

        let outcome = members.delete_member(&otis, ParentDeletePolicy::Block).await.unwrap();
        assert!(matches!(outcome, MemberRemoval::Deleted { detached_litters: 0, .. }));
        assert!(members.list_members().await.unwrap().is_empty());
    }
}
