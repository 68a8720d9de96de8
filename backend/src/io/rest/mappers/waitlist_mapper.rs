use chrono::SecondsFormat;
use shared::{
    JoinWaitlistRequest, RankedWaitlistEntry, UpdateWaitlistEntryRequest,
    WaitlistEntry as SharedWaitlistEntry, WaitlistEntryResponse, WaitlistListResponse,
    WaitlistPosition, WaitlistPositionResponse,
};

use crate::domain::commands::waitlist::{
    JoinWaitlistCommand, PositionLookupResult, UpdateWaitlistEntryCommand,
};
use crate::domain::models::waitlist::DomainWaitlistEntry;
use crate::domain::waitlist_queue::RankedEntry;

pub struct WaitlistMapper;

impl WaitlistMapper {
    pub fn to_join_command(request: JoinWaitlistRequest) -> JoinWaitlistCommand {
        JoinWaitlistCommand {
            name: request.name,
            phone: request.phone,
            gender_preference: request.gender_preference,
            color_preference: request.color_preference,
        }
    }

    pub fn to_update_command(request: UpdateWaitlistEntryRequest) -> UpdateWaitlistEntryCommand {
        UpdateWaitlistEntryCommand {
            status: request.status,
            notes: request.notes,
        }
    }

    /// Phone numbers leave the backend in display form only
    pub fn to_dto(domain: DomainWaitlistEntry) -> SharedWaitlistEntry {
        SharedWaitlistEntry {
            id: domain.id,
            name: domain.name,
            phone: domain.phone.formatted(),
            gender_preference: domain.gender_preference,
            color_preference: domain.color_preference,
            status: domain.status,
            notes: domain.notes,
            submitted_at: domain.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_entry_response_dto(domain: DomainWaitlistEntry, message: &str) -> WaitlistEntryResponse {
        WaitlistEntryResponse {
            entry: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_list_dto(ranked: Vec<RankedEntry>) -> WaitlistListResponse {
        WaitlistListResponse {
            entries: ranked
                .into_iter()
                .map(|r| RankedWaitlistEntry {
                    rank: r.rank,
                    entry: Self::to_dto(r.entry),
                })
                .collect(),
        }
    }

    pub fn to_position_dto(result: PositionLookupResult) -> WaitlistPositionResponse {
        WaitlistPositionResponse {
            found: !result.positions.is_empty(),
            positions: result
                .positions
                .into_iter()
                .map(|p| WaitlistPosition {
                    segment: p.segment,
                    color_preference: p.color_preference,
                    rank: p.rank,
                })
                .collect(),
            message: result.message,
        }
    }
}
