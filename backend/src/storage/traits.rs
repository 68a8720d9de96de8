//! # Storage Traits
//!
//! Storage abstractions the domain services depend on. The SQLite
//! repositories in `repositories/` are the only implementations today.
//!
//! Methods that remove rows owning an image also record the image key in the
//! release queue inside the same transaction, so a crash between the delete
//! and the blob release never loses track of a blob.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::ParentDeletePolicy;
use crate::domain::models::grumble::DomainGrumbleMember;
use crate::domain::models::litter::{DomainLitter, LitterWithPuppies};
use crate::domain::models::puppy::DomainPuppy;
use crate::domain::models::waitlist::DomainWaitlistEntry;

/// Rows removed by a litter delete, plus the image keys queued for release
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeRemoval {
    pub deleted_puppies: usize,
    pub queued_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberRemoval {
    Deleted {
        detached_litters: usize,
        queued_images: Vec<String>,
    },
    /// The member is still a parent of these litters (names)
    Blocked { litters: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaitlistInsert {
    /// Stored, with the insertion sequence assigned by storage
    Inserted(DomainWaitlistEntry),
    Duplicate,
}

#[async_trait]
pub trait LitterStorage: Send + Sync {
    async fn store_litter(&self, litter: &DomainLitter) -> Result<()>;

    /// A litter with its puppies, read in one transaction
    async fn get_litter(&self, litter_id: &str) -> Result<Option<LitterWithPuppies>>;

    /// Every litter (newest first) with its puppies, read in one transaction
    async fn list_litters(&self) -> Result<Vec<LitterWithPuppies>>;

    /// Overwrite the litter row and queue `replaced_image` for release.
    /// Returns the queued keys, or `None` when the litter no longer exists.
    async fn update_litter(
        &self,
        litter: &DomainLitter,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>>;

    /// Delete the litter and all of its puppies. Returns `None` when the litter does not exist.
    async fn delete_litter(&self, litter_id: &str) -> Result<Option<CascadeRemoval>>;
}

#[async_trait]
pub trait PuppyStorage: Send + Sync {
    /// Insert all puppies in one transaction. Fails without writing anything
    /// when any puppy's litter does not exist.
    async fn store_puppies(&self, puppies: &[DomainPuppy]) -> Result<()>;

    /// A puppy, only if it belongs to `litter_id`
    async fn get_puppy(&self, litter_id: &str, puppy_id: &str) -> Result<Option<DomainPuppy>>;

    /// Returns the queued image keys, or `None` when the puppy is gone
    async fn update_puppy(
        &self,
        puppy: &DomainPuppy,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>>;

    /// Delete a puppy scoped to its litter and queue its image.
    /// Returns the queued keys, or `None` when no such puppy is in the litter.
    async fn delete_puppy(&self, litter_id: &str, puppy_id: &str) -> Result<Option<Vec<String>>>;
}

#[async_trait]
pub trait GrumbleStorage: Send + Sync {
    async fn store_member(&self, member: &DomainGrumbleMember) -> Result<()>;

    async fn get_member(&self, member_id: &str) -> Result<Option<DomainGrumbleMember>>;

    /// All members ordered by name
    async fn list_members(&self) -> Result<Vec<DomainGrumbleMember>>;

    async fn update_member(
        &self,
        member: &DomainGrumbleMember,
        replaced_image: Option<&str>,
    ) -> Result<Option<Vec<String>>>;

    /// Names of litters that have this member as mother or father
    async fn referencing_litters(&self, member_id: &str) -> Result<Vec<String>>;

    /// Delete a member, honoring `policy` for litters that still reference it
    async fn delete_member(
        &self,
        member: &DomainGrumbleMember,
        policy: ParentDeletePolicy,
    ) -> Result<MemberRemoval>;
}

#[async_trait]
pub trait WaitlistStorage: Send + Sync {
    /// Insert unless an entry with the same (gender, phone, color) exists.
    /// The check and the insert run in one transaction.
    async fn insert_entry(&self, entry: &DomainWaitlistEntry) -> Result<WaitlistInsert>;

    async fn get_entry(&self, entry_id: &str) -> Result<Option<DomainWaitlistEntry>>;

    /// Every entry, ordered by gender segment then submission order
    async fn list_entries(&self) -> Result<Vec<DomainWaitlistEntry>>;

    /// Returns false when the entry no longer exists
    async fn update_entry(&self, entry: &DomainWaitlistEntry) -> Result<bool>;

    /// Returns true if the entry was found and deleted
    async fn delete_entry(&self, entry_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite
    async fn put_setting(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
pub trait ImageReleaseStorage: Send + Sync {
    /// Every queued key, oldest first, without duplicates
    async fn pending_keys(&self) -> Result<Vec<String>>;

    /// Forget a key once its blob has been released
    async fn mark_released(&self, image_key: &str) -> Result<()>;
}
