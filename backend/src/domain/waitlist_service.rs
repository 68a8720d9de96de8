//! Waitlist service: public registration and position lookup, plus the
//! admin operations on individual entries.

use chrono::Utc;
use shared::{ColorPreference, Gender, WaitlistStatus};
use std::sync::Arc;
use tracing::{info, warn};

use super::commands::waitlist::{JoinWaitlistCommand, PositionLookupResult, UpdateWaitlistEntryCommand};
use super::errors::{KennelError, KennelResult};
use super::models::generate_id;
use super::models::waitlist::{DomainWaitlistEntry, PhoneNumber};
use super::settings_service::SettingsService;
use super::validation::{check_max_len, RequiredFields};
use super::waitlist_queue::{describe_positions, positions_for, rank_segments, RankedEntry};
use crate::storage::{WaitlistInsert, WaitlistStorage};

const MAX_NAME_LEN: usize = 50;
const MAX_NOTES_LEN: usize = 1000;

#[derive(Clone)]
pub struct WaitlistService {
    entries: Arc<dyn WaitlistStorage>,
    settings: SettingsService,
}

impl WaitlistService {
    pub fn new(entries: Arc<dyn WaitlistStorage>, settings: SettingsService) -> Self {
        Self { entries, settings }
    }

    /// Register a customer. Rejected without writing anything when the same
    /// phone already holds an entry for the same gender and color preference.
    pub async fn enqueue(&self, command: JoinWaitlistCommand) -> KennelResult<DomainWaitlistEntry> {
        info!(
            "Waitlist registration: gender={:?}, color={:?}",
            command.gender_preference, command.color_preference
        );

        if !self.settings.waitlist_enabled().await? {
            warn!("Rejected waitlist registration: waitlist is closed");
            return Err(KennelError::WaitlistClosed);
        }

        let mut required = RequiredFields::new();
        let name = required.text("name", command.name.as_deref());
        let phone = required.text("phone", command.phone.as_deref());
        let gender = required.text("gender_preference", command.gender_preference.as_deref());
        required.finish()?;
        let (Some(name), Some(phone), Some(gender)) = (name, phone, gender) else {
            return Err(KennelError::invalid("Name, phone and gender preference are required"));
        };

        check_max_len("name", &name, MAX_NAME_LEN)?;
        let phone = PhoneNumber::parse(&phone)?;
        let gender: Gender = gender.parse()?;
        let color = ColorPreference::from_optional(command.color_preference.as_deref())?;

        let now = Utc::now();
        let entry = DomainWaitlistEntry {
            id: generate_id("waitlist", now.timestamp_millis() as u64),
            seq: 0,
            name,
            phone,
            gender_preference: gender,
            color_preference: color,
            status: WaitlistStatus::Pending,
            notes: String::new(),
            submitted_at: now,
        };

        match self.entries.insert_entry(&entry).await? {
            WaitlistInsert::Inserted(stored) => {
                info!("Added waitlist entry {} ({} / {})", stored.id, gender, color);
                Ok(stored)
            }
            WaitlistInsert::Duplicate => {
                warn!("Duplicate waitlist registration for {} / {}", gender, color);
                Err(KennelError::DuplicateEntry { gender, color })
            }
        }
    }

    /// Every place in line held by a phone number, ranked within its gender segment
    pub async fn position_of(&self, phone: &str) -> KennelResult<PositionLookupResult> {
        let phone = PhoneNumber::parse(phone)?;
        info!("Looking up waitlist positions for {}", phone.formatted());

        let ranked = rank_segments(self.entries.list_entries().await?);
        let positions = positions_for(&ranked, &phone);
        let message = describe_positions(&positions);

        Ok(PositionLookupResult { positions, message })
    }

    /// Admin view: all entries with their rank, by segment then rank
    pub async fn list_ranked(&self) -> KennelResult<Vec<RankedEntry>> {
        info!("Listing waitlist");
        Ok(rank_segments(self.entries.list_entries().await?))
    }

    pub async fn get_entry(&self, entry_id: &str) -> KennelResult<DomainWaitlistEntry> {
        info!("Getting waitlist entry: {}", entry_id);
        self.entries
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| KennelError::not_found("Waitlist entry", entry_id))
    }

    pub async fn update_entry(
        &self,
        entry_id: &str,
        command: UpdateWaitlistEntryCommand,
    ) -> KennelResult<DomainWaitlistEntry> {
        info!("Updating waitlist entry: {}", entry_id);
        let mut entry = self.get_entry(entry_id).await?;

        if let Some(status) = command.status.as_deref() {
            entry.status = status.parse()?;
        }
        if let Some(notes) = command.notes {
            check_max_len("notes", &notes, MAX_NOTES_LEN)?;
            entry.notes = notes;
        }

        if !self.entries.update_entry(&entry).await? {
            return Err(KennelError::not_found("Waitlist entry", entry_id));
        }
        info!("Updated waitlist entry {} (status {})", entry.id, entry.status);
        Ok(entry)
    }

    pub async fn delete_entry(&self, entry_id: &str) -> KennelResult<()> {
        info!("Deleting waitlist entry: {}", entry_id);
        if !self.entries.delete_entry(entry_id).await? {
            warn!("Waitlist entry not found: {}", entry_id);
            return Err(KennelError::not_found("Waitlist entry", entry_id));
        }
        Ok(())
    }
}
