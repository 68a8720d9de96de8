//! Puppies only exist inside a litter. Every operation here is addressed by
//! (litter id, puppy id); a puppy id that belongs to another litter is
//! treated exactly like one that does not exist.

use chrono::Utc;
use shared::{Gender, PuppyColor};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::puppies::{CreatePuppyCommand, UpdatePuppyCommand};
use super::errors::{KennelError, KennelResult};
use super::image_lifecycle::ImageLifecycle;
use super::models::generate_id;
use super::models::puppy::{DomainPuppy, PUPPY_PLACEHOLDER_IMAGE};
use super::puppy_status::{initial_status, parse_status, StatusTransition};
use super::validation::{non_blank, RequiredFields};
use crate::storage::{LitterStorage, PuppyStorage};

#[derive(Clone)]
pub struct PuppyService {
    litters: Arc<dyn LitterStorage>,
    puppies: Arc<dyn PuppyStorage>,
    images: ImageLifecycle,
}

impl PuppyService {
    pub fn new(
        litters: Arc<dyn LitterStorage>,
        puppies: Arc<dyn PuppyStorage>,
        images: ImageLifecycle,
    ) -> Self {
        Self {
            litters,
            puppies,
            images,
        }
    }

    pub async fn add_puppy(&self, litter_id: &str, command: CreatePuppyCommand) -> KennelResult<DomainPuppy> {
        let mut added = self.add_puppies(litter_id, vec![command]).await?;
        added
            .pop()
            .ok_or_else(|| KennelError::Internal(anyhow::anyhow!("Puppy insert returned nothing")))
    }

    /// Add a batch of puppies. The whole batch is validated before anything
    /// is written and then inserted in one transaction.
    pub async fn add_puppies(
        &self,
        litter_id: &str,
        commands: Vec<CreatePuppyCommand>,
    ) -> KennelResult<Vec<DomainPuppy>> {
        info!("Adding {} puppies to litter {}", commands.len(), litter_id);

        if commands.is_empty() {
            return Err(KennelError::invalid("At least one puppy is required"));
        }
        if self.litters.get_litter(litter_id).await?.is_none() {
            warn!("Cannot add puppies, litter not found: {}", litter_id);
            return Err(KennelError::not_found("Litter", litter_id));
        }

        let now = Utc::now();
        let millis = now.timestamp_millis() as u64;
        let batch = commands.len() > 1;
        let mut puppies = Vec::with_capacity(commands.len());
        for (index, command) in commands.into_iter().enumerate() {
            let prefix = if batch { format!("puppies[{}].", index) } else { String::new() };
            puppies.push(Self::build_puppy(litter_id, command, &prefix, millis)?);
        }

        for puppy in &puppies {
            self.images.check_reference(&puppy.profile_image).await;
        }
        self.puppies.store_puppies(&puppies).await?;

        info!("Added {} puppies to litter {}", puppies.len(), litter_id);
        Ok(puppies)
    }

    fn build_puppy(
        litter_id: &str,
        command: CreatePuppyCommand,
        field_prefix: &str,
        millis: u64,
    ) -> KennelResult<DomainPuppy> {
        let mut required = RequiredFields::new();
        let name = required.text(&format!("{}name", field_prefix), command.name.as_deref());
        let color = required.text(&format!("{}color", field_prefix), command.color.as_deref());
        let gender = required.text(&format!("{}gender", field_prefix), command.gender.as_deref());
        required.finish()?;

        let (Some(name), Some(color), Some(gender)) = (name, color, gender) else {
            return Err(KennelError::invalid("Puppy name, color and gender are required"));
        };

        validate_price(command.price)?;
        let now = Utc::now();
        Ok(DomainPuppy {
            id: generate_id("puppy", millis),
            litter_id: litter_id.to_string(),
            name,
            color: color.parse::<PuppyColor>()?,
            gender: gender.parse::<Gender>()?,
            status: initial_status(command.status.as_deref())?,
            price: command.price,
            description: non_blank(command.description.as_deref()),
            profile_image: non_blank(command.profile_image.as_deref())
                .unwrap_or_else(|| PUPPY_PLACEHOLDER_IMAGE.to_string()),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn update_puppy(
        &self,
        litter_id: &str,
        puppy_id: &str,
        command: UpdatePuppyCommand,
    ) -> KennelResult<DomainPuppy> {
        info!("Updating puppy {} in litter {}", puppy_id, litter_id);

        let mut puppy = self
            .puppies
            .get_puppy(litter_id, puppy_id)
            .await?
            .ok_or_else(|| KennelError::not_found("Puppy", puppy_id))?;

        if let Some(name) = command.name.as_deref() {
            puppy.name = non_blank(Some(name))
                .ok_or_else(|| KennelError::missing_fields(vec!["name".to_string()]))?;
        }
        if let Some(color) = command.color.as_deref() {
            puppy.color = color.parse()?;
        }
        if let Some(gender) = command.gender.as_deref() {
            puppy.gender = gender.parse()?;
        }
        if let Some(status) = command.status.as_deref() {
            let transition = StatusTransition::new(puppy.status, parse_status(status)?);
            if transition.reopens() {
                info!("Puppy {} is back on offer ({} -> {})", puppy_id, transition.from, transition.to);
            } else if transition.closes() {
                info!("Puppy {} is off the market ({} -> {})", puppy_id, transition.from, transition.to);
            } else if transition.is_change() {
                info!("Puppy {} status {} -> {}", puppy_id, transition.from, transition.to);
            }
            puppy.status = transition.to;
        }
        if command.clear_price {
            puppy.price = None;
        } else if let Some(price) = command.price {
            validate_price(Some(price))?;
            puppy.price = Some(price);
        }
        if let Some(description) = command.description.as_deref() {
            puppy.description = non_blank(Some(description));
        }

        let mut replaced_image = None;
        if let Some(image) = non_blank(command.profile_image.as_deref()) {
            if image != puppy.profile_image {
                self.images.check_reference(&image).await;
                replaced_image = Some(std::mem::replace(&mut puppy.profile_image, image));
            }
        }

        puppy.updated_at = Utc::now();
        let queued = self
            .puppies
            .update_puppy(&puppy, replaced_image.as_deref())
            .await?
            .ok_or_else(|| KennelError::not_found("Puppy", puppy_id))?;

        if !self.images.release(&queued).await.is_empty() {
            warn!("Replaced image for puppy {} is still queued for release", puppy_id);
        }

        info!("Updated puppy: {} with ID: {}", puppy.name, puppy.id);
        Ok(puppy)
    }

    pub async fn delete_puppy(&self, litter_id: &str, puppy_id: &str) -> KennelResult<()> {
        info!("Deleting puppy {} from litter {}", puppy_id, litter_id);

        let queued = self
            .puppies
            .delete_puppy(litter_id, puppy_id)
            .await?
            .ok_or_else(|| KennelError::not_found("Puppy", puppy_id))?;

        let unreleased = self.images.release(&queued).await;
        if !unreleased.is_empty() {
            return Err(KennelError::CascadeFailure {
                entity: "Puppy",
                id: puppy_id.to_string(),
                unreleased,
            });
        }

        info!("Deleted puppy {}", puppy_id);
        Ok(())
    }
}

fn validate_price(price: Option<f64>) -> KennelResult<()> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(KennelError::invalid(format!(
            "Price must be a non-negative amount, got {}",
            p
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::image_lifecycle::test_support::memory_lifecycle;
    use crate::domain::litter_service::tests::{create_command, test_clock};
    use crate::domain::litter_service::LitterService;
    use crate::storage::images::test_support::MemoryImageStore;
    use crate::storage::{DbConnection, GrumbleRepository, LitterRepository, PuppyRepository};
    use shared::{LitterClassification, PuppyStatus};

    struct Fixture {
        puppies: PuppyService,
        litters: LitterService,
        store: Arc<MemoryImageStore>,
        db: DbConnection,
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let (images, store) = memory_lifecycle(&db);
        let litter_repo = Arc::new(LitterRepository::new(db.clone()));
        Fixture {
            puppies: PuppyService::new(
                litter_repo.clone(),
                Arc::new(PuppyRepository::new(db.clone())),
                images.clone(),
            ),
            litters: LitterService::new(
                litter_repo,
                Arc::new(GrumbleRepository::new(db.clone())),
                images,
                test_clock(),
            ),
            store,
            db,
        }
    }

    fn puppy(name: &str, status: Option<&str>) -> CreatePuppyCommand {
        CreatePuppyCommand {
            name: Some(name.to_string()),
            color: Some("fawn".to_string()),
            gender: Some("male".to_string()),
            status: status.map(str::to_string),
            price: Some(2800.0),
            ..Default::default()
        }
    }

    async fn puppy_count(db: &DbConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM puppies")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_puppy_defaults() {
        let f = setup_test().await;
        let litter = f.litters.create_litter(create_command("A")).await.unwrap();
        let added = f
            .puppies
            .add_puppy(&litter.litter.litter.id, puppy("Waffles", None))
            .await
            .unwrap();

        assert_eq!(added.status, PuppyStatus::Available);
        assert_eq!(added.profile_image, PUPPY_PLACEHOLDER_IMAGE);
        assert_eq!(added.litter_id, litter.litter.litter.id);
    }

    #[tokio::test]
    async fn test_add_to_missing_litter_creates_no_orphan() {
        let f = setup_test().await;
        let err = f.puppies.add_puppy("litter::ghost", puppy("Waffles", None)).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(puppy_count(&f.db).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_batch_writes_nothing() {
        let f = setup_test().await;
        let id = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;

        let mut bad = puppy("Bad", None);
        bad.color = None;
        bad.gender = Some("   ".to_string());
        let err = f
            .puppies
            .add_puppies(&id, vec![puppy("Good", None), bad])
            .await
            .unwrap_err();

        match err {
            KennelError::Validation { missing, .. } => {
                assert_eq!(missing, vec!["puppies[1].color", "puppies[1].gender"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(puppy_count(&f.db).await, 0);

        let err = f
            .puppies
            .add_puppies(&id, vec![puppy("Good", None), puppy("Odd", Some("Adopted"))])
            .await
            .unwrap_err();
        assert!(matches!(err, KennelError::Validation { .. }));
        assert_eq!(puppy_count(&f.db).await, 0);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let f = setup_test().await;
        let id = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        let mut command = puppy("Cheap", None);
        command.price = Some(-1.0);
        assert!(f.puppies.add_puppy(&id, command).await.is_err());
    }

    #[tokio::test]
    async fn test_update_scoped_to_litter() {
        let f = setup_test().await;
        let a = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        let b = f.litters.create_litter(create_command("B")).await.unwrap().litter.litter.id;
        let pup = f.puppies.add_puppy(&a, puppy("Waffles", None)).await.unwrap();

        let err = f
            .puppies
            .update_puppy(&b, &pup.id, UpdatePuppyCommand {
                status: Some("Sold".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(f.puppies.delete_puppy(&b, &pup.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_sold_back_to_available_reclassifies_only_its_litter() {
        let f = setup_test().await;
        let a = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        let b = f.litters.create_litter(create_command("B")).await.unwrap().litter.litter.id;
        let pup_a = f.puppies.add_puppy(&a, puppy("Waffles", Some("Sold"))).await.unwrap();
        f.puppies.add_puppy(&b, puppy("Pancake", Some("Sold"))).await.unwrap();

        assert_eq!(f.litters.get_litter(&a).await.unwrap().classification, LitterClassification::Past);

        let updated = f
            .puppies
            .update_puppy(&a, &pup_a.id, UpdatePuppyCommand {
                status: Some("Available".to_string()),
                clear_price: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.status, PuppyStatus::Available);
        assert_eq!(updated.price, None);

        assert_eq!(f.litters.get_litter(&a).await.unwrap().classification, LitterClassification::Current);
        assert_eq!(f.litters.get_litter(&b).await.unwrap().classification, LitterClassification::Past);

        let past = f.litters.list_by_classification(LitterClassification::Past).await.unwrap();
        let current = f.litters.list_by_classification(LitterClassification::Current).await.unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(current.len(), 1);
        assert_eq!(past[0].litter.litter.id, b);
    }

    #[tokio::test]
    async fn test_delete_litter_cascades_to_puppies_and_images() {
        let f = setup_test().await;
        let mut command = create_command("A");
        command.profile_image = Some("litter-a.jpg".to_string());
        let id = f.litters.create_litter(command).await.unwrap().litter.litter.id;

        let mut batch = Vec::new();
        for i in 0..3 {
            let key = format!("puppy-{i}.jpg");
            f.store.add(&key);
            let mut p = puppy(&format!("Pup {i}"), None);
            p.profile_image = Some(key);
            batch.push(p);
        }
        f.store.add("litter-a.jpg");
        f.puppies.add_puppies(&id, batch).await.unwrap();

        let result = f.litters.delete_litter(&id).await.unwrap();
        assert_eq!(result.deleted_puppies, 3);
        assert_eq!(result.released_images, 4);
        assert_eq!(puppy_count(&f.db).await, 0);
        for key in ["litter-a.jpg", "puppy-0.jpg", "puppy-1.jpg", "puppy-2.jpg"] {
            assert!(!f.store.contains(key), "{key} should have been released");
        }
    }

    #[tokio::test]
    async fn test_delete_puppy_releases_its_image() {
        let f = setup_test().await;
        let id = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        let mut command = puppy("Waffles", None);
        command.profile_image = Some("puppy-w.jpg".to_string());
        f.store.add("puppy-w.jpg");
        let pup = f.puppies.add_puppy(&id, command).await.unwrap();

        f.puppies.delete_puppy(&id, &pup.id).await.unwrap();
        assert!(!f.store.contains("puppy-w.jpg"));
        assert_eq!(puppy_count(&f.db).await, 0);
    }

    #[tokio::test]
    async fn test_shared_image_survives_until_last_reference_goes() {
        let f = setup_test().await;
        let id = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        f.store.add("shared.jpg");

        let mut first = puppy("Waffles", None);
        first.profile_image = Some("shared.jpg".to_string());
        let mut second = puppy("Pancake", None);
        second.profile_image = Some("shared.jpg".to_string());
        let first = f.puppies.add_puppy(&id, first).await.unwrap();
        let second = f.puppies.add_puppy(&id, second).await.unwrap();

        f.puppies.delete_puppy(&id, &first.id).await.unwrap();
        assert!(f.store.contains("shared.jpg"));
        let view = f.litters.get_litter(&id).await.unwrap();
        assert_eq!(view.litter.puppies.len(), 1);
        assert_eq!(view.litter.puppies[0].profile_image, "shared.jpg");

        f.puppies.delete_puppy(&id, &second.id).await.unwrap();
        assert!(!f.store.contains("shared.jpg"));
    }

    #[tokio::test]
    async fn test_replacing_shared_image_keeps_blob() {
        let f = setup_test().await;
        let mut command = create_command("A");
        command.profile_image = Some("shared.jpg".to_string());
        f.store.add("shared.jpg");
        let id = f.litters.create_litter(command).await.unwrap().litter.litter.id;

        let mut pup = puppy("Waffles", None);
        pup.profile_image = Some("shared.jpg".to_string());
        let pup = f.puppies.add_puppy(&id, pup).await.unwrap();

        f.store.add("waffles.jpg");
        let updated = f
            .puppies
            .update_puppy(&id, &pup.id, UpdatePuppyCommand {
                profile_image: Some("waffles.jpg".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.profile_image, "waffles.jpg");
        assert!(f.store.contains("shared.jpg"));
    }

    #[tokio::test]
    async fn test_update_of_vanished_puppy_is_not_found() {
        let f = setup_test().await;
        let id = f.litters.create_litter(create_command("A")).await.unwrap().litter.litter.id;
        let pup = f.puppies.add_puppy(&id, puppy("Waffles", None)).await.unwrap();
        f.puppies.delete_puppy(&id, &pup.id).await.unwrap();

        let err = f
            .puppies
            .update_puppy(&id, &pup.id, UpdatePuppyCommand {
                name: Some("Ghost".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
