use chrono::SecondsFormat;
use shared::{
    CreateGrumbleMemberRequest, GrumbleListResponse, GrumbleMember as SharedGrumbleMember,
    GrumbleMemberResponse, UpdateGrumbleMemberRequest,
};

use crate::domain::commands::grumble::{CreateGrumbleMemberCommand, UpdateGrumbleMemberCommand};
use crate::domain::models::grumble::DomainGrumbleMember;

pub struct GrumbleMapper;

impl GrumbleMapper {
    pub fn to_create_command(request: CreateGrumbleMemberRequest) -> CreateGrumbleMemberCommand {
        CreateGrumbleMemberCommand {
            name: request.name,
            gender: request.gender,
            description: request.description,
            birth_date: request.birth_date,
            profile_image: request.profile_image,
        }
    }

    pub fn to_update_command(request: UpdateGrumbleMemberRequest) -> UpdateGrumbleMemberCommand {
        UpdateGrumbleMemberCommand {
            name: request.name,
            gender: request.gender,
            description: request.description,
            birth_date: request.birth_date,
            profile_image: request.profile_image,
        }
    }

    pub fn to_dto(domain: DomainGrumbleMember) -> SharedGrumbleMember {
        SharedGrumbleMember {
            id: domain.id,
            name: domain.name,
            gender: domain.gender,
            description: domain.description,
            birth_date: domain.birth_date.format("%Y-%m-%d").to_string(),
            profile_image: domain.profile_image,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: domain.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_list_dto(members: Vec<DomainGrumbleMember>) -> GrumbleListResponse {
        GrumbleListResponse {
            members: members.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_member_response_dto(domain: DomainGrumbleMember, message: &str) -> GrumbleMemberResponse {
        GrumbleMemberResponse {
            member: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }
}
