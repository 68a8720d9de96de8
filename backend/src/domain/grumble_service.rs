use chrono::Utc;
use shared::Gender;
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::grumble::{
    CreateGrumbleMemberCommand, DeleteGrumbleMemberResult, UpdateGrumbleMemberCommand,
};
use super::errors::{KennelError, KennelResult};
use super::image_lifecycle::ImageLifecycle;
use super::models::generate_id;
use super::models::grumble::{DomainGrumbleMember, GRUMBLE_PLACEHOLDER_IMAGE};
use super::validation::{check_max_len, non_blank, parse_date, RequiredFields};
use crate::config::ParentDeletePolicy;
use crate::storage::{GrumbleStorage, MemberRemoval};

const MAX_NAME_LEN: usize = 50;

/// Service for the kennel's breeding stock
#[derive(Clone)]
pub struct GrumbleService {
    members: Arc<dyn GrumbleStorage>,
    images: ImageLifecycle,
    delete_policy: ParentDeletePolicy,
}

impl GrumbleService {
    pub fn new(
        members: Arc<dyn GrumbleStorage>,
        images: ImageLifecycle,
        delete_policy: ParentDeletePolicy,
    ) -> Self {
        Self {
            members,
            images,
            delete_policy,
        }
    }

    pub async fn create_member(&self, command: CreateGrumbleMemberCommand) -> KennelResult<DomainGrumbleMember> {
        info!("Creating grumble member: {:?}", command.name);

        let mut required = RequiredFields::new();
        let name = required.text("name", command.name.as_deref());
        let gender = required.text("gender", command.gender.as_deref());
        let birth_date = required.text("birth_date", command.birth_date.as_deref());
        required.finish()?;
        let (Some(name), Some(gender), Some(birth_date)) = (name, gender, birth_date) else {
            return Err(KennelError::invalid("Name, gender and birth date are required"));
        };
        check_max_len("name", &name, MAX_NAME_LEN)?;

        let profile_image = non_blank(command.profile_image.as_deref())
            .unwrap_or_else(|| GRUMBLE_PLACEHOLDER_IMAGE.to_string());
        self.images.check_reference(&profile_image).await;

        let now = Utc::now();
        let member = DomainGrumbleMember {
            id: generate_id("grumble", now.timestamp_millis() as u64),
            name,
            gender: gender.parse()?,
            description: command.description.unwrap_or_default().trim().to_string(),
            birth_date: parse_date("birth_date", &birth_date)?,
            profile_image,
            created_at: now,
            updated_at: now,
        };

        self.members.store_member(&member).await?;
        info!("Created grumble member: {} with ID: {}", member.name, member.id);
        Ok(member)
    }

    pub async fn get_member(&self, member_id: &str) -> KennelResult<DomainGrumbleMember> {
        info!("Getting grumble member: {}", member_id);
        self.members.get_member(member_id).await?.ok_or_else(|| {
            warn!("Grumble member not found: {}", member_id);
            KennelError::not_found("Grumble member", member_id)
        })
    }

    pub async fn list_members(&self) -> KennelResult<Vec<DomainGrumbleMember>> {
        info!("Listing grumble members");
        Ok(self.members.list_members().await?)
    }

    pub async fn update_member(
        &self,
        member_id: &str,
        command: UpdateGrumbleMemberCommand,
    ) -> KennelResult<DomainGrumbleMember> {
        info!("Updating grumble member: {}", member_id);
        let mut member = self.get_member(member_id).await?;

        if let Some(name) = command.name.as_deref() {
            let name = non_blank(Some(name))
                .ok_or_else(|| KennelError::missing_fields(vec!["name".to_string()]))?;
            check_max_len("name", &name, MAX_NAME_LEN)?;
            member.name = name;
        }
        if let Some(gender) = command.gender.as_deref() {
            let gender: Gender = gender.parse()?;
            if gender != member.gender {
                // A parent's gender is fixed by the litters it is recorded on
                let litters = self.members.referencing_litters(member_id).await?;
                if !litters.is_empty() {
                    return Err(KennelError::Conflict(format!(
                        "{} is a parent of {} and cannot change gender",
                        member.name,
                        litters.join(", ")
                    )));
                }
                member.gender = gender;
            }
        }
        if let Some(description) = command.description {
            member.description = description.trim().to_string();
        }
        if let Some(date) = command.birth_date.as_deref() {
            member.birth_date = parse_date("birth_date", date)?;
        }

        let mut replaced_image = None;
        if let Some(image) = non_blank(command.profile_image.as_deref()) {
            if image != member.profile_image {
                self.images.check_reference(&image).await;
                replaced_image = Some(std::mem::replace(&mut member.profile_image, image));
            }
        }

        member.updated_at = Utc::now();
        let queued = self
            .members
            .update_member(&member, replaced_image.as_deref())
            .await?
            .ok_or_else(|| KennelError::not_found("Grumble member", member_id))?;
        if !self.images.release(&queued).await.is_empty() {
            warn!("Replaced image for grumble member {} is still queued for release", member_id);
        }

        info!("Updated grumble member: {} with ID: {}", member.name, member.id);
        Ok(member)
    }

    /// Delete a member. Litters still naming it as a parent are handled by the configured policy.
    pub async fn delete_member(&self, member_id: &str) -> KennelResult<DeleteGrumbleMemberResult> {
        info!("Deleting grumble member {} (policy {:?})", member_id, self.delete_policy);
        let member = self.get_member(member_id).await?;

        match self.members.delete_member(&member, self.delete_policy).await? {
            MemberRemoval::Blocked { litters } => {
                warn!("Refusing to delete {}: parent of {:?}", member.name, litters);
                Err(KennelError::Conflict(format!(
                    "{} is a parent of {} and cannot be deleted",
                    member.name,
                    litters.join(", ")
                )))
            }
            MemberRemoval::Deleted {
                detached_litters,
                queued_images,
            } => {
                let unreleased = self.images.release(&queued_images).await;
                if !unreleased.is_empty() {
                    return Err(KennelError::CascadeFailure {
                        entity: "Grumble member",
                        id: member.id,
                        unreleased,
                    });
                }
                info!(
                    "Deleted grumble member {} ({} litters detached)",
                    member.id, detached_litters
                );
                Ok(DeleteGrumbleMemberResult {
                    member_id: member.id,
                    detached_litters,
                })
            }
        }
    }
}
