//! Litter lifecycle: create, read, update and the cascading delete.
//!
//! Every read recomputes the litter's classification and birth-date framing
//! from the snapshot it just loaded; nothing derived is stored or cached.
//! Deleting a litter removes its puppies and queues every image the
//! aggregate held in one transaction, then releases the blobs. If any blob
//! cannot be released the caller gets a `CascadeFailure` naming the keys
//! (the rows are already gone and the keys stay queued for retry).

use chrono::Utc;
use shared::{Gender, LitterClassification};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::litters::{
    CreateLitterCommand, DeleteLitterResult, LitterView, ParentFields, UpdateLitterCommand,
};
use super::errors::{KennelError, KennelResult};
use super::image_lifecycle::ImageLifecycle;
use super::litter_classification::{classify, frame_birth_date, partition, BusinessClock};
use super::models::generate_id;
use super::models::litter::{DomainLitter, LitterWithPuppies, ParentRef, LITTER_PLACEHOLDER_IMAGE};
use super::validation::{non_blank, parse_date, RequiredFields};
use crate::storage::{GrumbleStorage, LitterStorage};

#[derive(Clone, Copy)]
enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    fn field(&self) -> &'static str {
        match self {
            ParentRole::Mother => "mother",
            ParentRole::Father => "father",
        }
    }

    fn expected_gender(&self) -> Gender {
        match self {
            ParentRole::Mother => Gender::Female,
            ParentRole::Father => Gender::Male,
        }
    }
}

#[derive(Clone)]
pub struct LitterService {
    litters: Arc<dyn LitterStorage>,
    members: Arc<dyn GrumbleStorage>,
    images: ImageLifecycle,
    clock: BusinessClock,
}

impl LitterService {
    pub fn new(
        litters: Arc<dyn LitterStorage>,
        members: Arc<dyn GrumbleStorage>,
        images: ImageLifecycle,
        clock: BusinessClock,
    ) -> Self {
        Self {
            litters,
            members,
            images,
            clock,
        }
    }

    pub async fn create_litter(&self, command: CreateLitterCommand) -> KennelResult<LitterView> {
        info!("Creating litter: {:?}", command.name);

        let mut required = RequiredFields::new();
        let name = required.text("name", command.name.as_deref());
        let birth_date = required.text("birth_date", command.birth_date.as_deref());
        let available_date = required.text("available_date", command.available_date.as_deref());
        if command.mother.is_empty() {
            required.mark("mother");
        }
        if command.father.is_empty() {
            required.mark("father");
        }
        required.finish()?;

        let (Some(name), Some(birth_date), Some(available_date)) = (name, birth_date, available_date)
        else {
            return Err(KennelError::invalid("Litter name and dates are required"));
        };

        let birth_date = parse_date("birth_date", &birth_date)?;
        let available_date = parse_date("available_date", &available_date)?;
        if available_date < birth_date {
            warn!(
                "Litter '{}' is available ({}) before it is born ({})",
                name, available_date, birth_date
            );
        }

        let mother = self.resolve_parent(ParentRole::Mother, &command.mother).await?;
        let father = self.resolve_parent(ParentRole::Father, &command.father).await?;

        let profile_image = non_blank(command.profile_image.as_deref())
            .unwrap_or_else(|| LITTER_PLACEHOLDER_IMAGE.to_string());
        self.images.check_reference(&profile_image).await;

        let now = Utc::now();
        let litter = DomainLitter {
            id: generate_id("litter", now.timestamp_millis() as u64),
            name,
            mother,
            father,
            birth_date,
            available_date,
            profile_image,
            created_at: now,
            updated_at: now,
        };

        self.litters.store_litter(&litter).await?;
        info!("Created litter: {} with ID: {}", litter.name, litter.id);

        Ok(self.view(LitterWithPuppies {
            litter,
            puppies: Vec::new(),
        }))
    }

    pub async fn get_litter(&self, litter_id: &str) -> KennelResult<LitterView> {
        info!("Getting litter: {}", litter_id);

        match self.litters.get_litter(litter_id).await? {
            Some(litter) => Ok(self.view(litter)),
            None => {
                warn!("Litter not found: {}", litter_id);
                Err(KennelError::not_found("Litter", litter_id))
            }
        }
    }

    /// All litters, newest first
    pub async fn list_litters(&self) -> KennelResult<Vec<LitterView>> {
        info!("Listing all litters");

        let litters = self.litters.list_litters().await?;
        info!("Found {} litters", litters.len());

        Ok(litters.into_iter().map(|l| self.view(l)).collect())
    }

    /// Litters in one listing. Both listings are cut from the same kind of
    /// single snapshot, so a litter lands in exactly one of them per read.
    pub async fn list_by_classification(
        &self,
        classification: LitterClassification,
    ) -> KennelResult<Vec<LitterView>> {
        info!("Listing {:?} litters", classification);

        let (current, past) = partition(self.litters.list_litters().await?);
        let selected = match classification {
            LitterClassification::Current => current,
            LitterClassification::Past => past,
        };
        Ok(selected.into_iter().map(|l| self.view(l)).collect())
    }

    pub async fn update_litter(
        &self,
        litter_id: &str,
        command: UpdateLitterCommand,
    ) -> KennelResult<LitterView> {
        info!("Updating litter: {}", litter_id);

        let aggregate = self
            .litters
            .get_litter(litter_id)
            .await?
            .ok_or_else(|| KennelError::not_found("Litter", litter_id))?;
        let mut litter = aggregate.litter.clone();

        if let Some(name) = command.name.as_deref() {
            litter.name = non_blank(Some(name))
                .ok_or_else(|| KennelError::missing_fields(vec!["name".to_string()]))?;
        }
        if let Some(date) = command.birth_date.as_deref() {
            litter.birth_date = parse_date("birth_date", date)?;
        }
        if let Some(date) = command.available_date.as_deref() {
            litter.available_date = parse_date("available_date", date)?;
        }
        if !command.mother.is_empty() {
            litter.mother = self.resolve_parent(ParentRole::Mother, &command.mother).await?;
        }
        if !command.father.is_empty() {
            litter.father = self.resolve_parent(ParentRole::Father, &command.father).await?;
        }

        let mut replaced_image = None;
        if let Some(image) = non_blank(command.profile_image.as_deref()) {
            if image != litter.profile_image {
                self.images.check_reference(&image).await;
                replaced_image = Some(std::mem::replace(&mut litter.profile_image, image));
            }
        }

        litter.updated_at = Utc::now();
        let queued = self
            .litters
            .update_litter(&litter, replaced_image.as_deref())
            .await?
            .ok_or_else(|| {
                warn!("Litter {} vanished before the update was written", litter_id);
                KennelError::not_found("Litter", litter_id)
            })?;

        if !self.images.release(&queued).await.is_empty() {
            warn!("Replaced image for litter {} is still queued for release", litter_id);
        }

        info!("Updated litter: {} with ID: {}", litter.name, litter.id);
        Ok(self.view(LitterWithPuppies {
            litter,
            puppies: aggregate.puppies,
        }))
    }

    /// Delete a litter, its puppies and every image they reference
    pub async fn delete_litter(&self, litter_id: &str) -> KennelResult<DeleteLitterResult> {
        info!("Deleting litter: {}", litter_id);

        let removal = self
            .litters
            .delete_litter(litter_id)
            .await?
            .ok_or_else(|| KennelError::not_found("Litter", litter_id))?;

        let unreleased = self.images.release(&removal.queued_images).await;
        if !unreleased.is_empty() {
            return Err(KennelError::CascadeFailure {
                entity: "Litter",
                id: litter_id.to_string(),
                unreleased,
            });
        }

        info!(
            "Deleted litter {} with {} puppies, released {} images",
            litter_id,
            removal.deleted_puppies,
            removal.queued_images.len()
        );
        Ok(DeleteLitterResult {
            litter_id: litter_id.to_string(),
            deleted_puppies: removal.deleted_puppies,
            released_images: removal.queued_images.len(),
        })
    }

    fn view(&self, litter: LitterWithPuppies) -> LitterView {
        let classification = classify(&litter);
        let birth_framing = frame_birth_date(litter.litter.birth_date, self.clock.today());
        LitterView {
            litter,
            classification,
            birth_framing,
        }
    }

    /// Turn supplied parent fields into a stored reference, checking that a
    /// referenced member exists and has the right gender
    async fn resolve_parent(&self, role: ParentRole, fields: &ParentFields) -> KennelResult<ParentRef> {
        let member_id = non_blank(fields.member_id.as_deref());
        let external_name = non_blank(fields.external_name.as_deref());

        match (member_id, external_name) {
            (Some(_), Some(_)) => Err(KennelError::invalid(format!(
                "Give either {role}_id or external_{role}_name, not both",
                role = role.field()
            ))),
            (None, None) => Err(KennelError::missing_fields(vec![role.field().to_string()])),
            (None, Some(name)) => Ok(ParentRef {
                member_id: None,
                external_name: Some(name.clone()),
                display_name: name,
            }),
            (Some(id), None) => {
                let member = self
                    .members
                    .get_member(&id)
                    .await?
                    .ok_or_else(|| KennelError::not_found("Grumble member", id.as_str()))?;
                if member.gender != role.expected_gender() {
                    return Err(KennelError::invalid(format!(
                        "{} is {} and cannot be a litter's {}",
                        member.name,
                        member.gender,
                        role.field()
                    )));
                }
                Ok(ParentRef {
                    member_id: Some(member.id),
                    external_name: None,
                    display_name: member.name,
                })
            }
        }
    }
}
