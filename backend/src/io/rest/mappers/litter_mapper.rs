use chrono::SecondsFormat;
use shared::{
    CreateLitterRequest, DateFraming, DeleteLitterResponse, Litter as SharedLitter,
    LitterListResponse, LitterResponse, UpdateLitterRequest,
};

use super::puppy_mapper::PuppyMapper;
use crate::domain::commands::litters::{
    CreateLitterCommand, DeleteLitterResult, LitterView, ParentFields, UpdateLitterCommand,
};

/// Mapper between litter DTOs and domain litter views
pub struct LitterMapper;

impl LitterMapper {
    pub fn to_create_command(request: CreateLitterRequest) -> CreateLitterCommand {
        CreateLitterCommand {
            name: request.name,
            mother: ParentFields {
                member_id: request.mother_id,
                external_name: request.external_mother_name,
            },
            father: ParentFields {
                member_id: request.father_id,
                external_name: request.external_father_name,
            },
            birth_date: request.birth_date,
            available_date: request.available_date,
            profile_image: request.profile_image,
        }
    }

    pub fn to_update_command(request: UpdateLitterRequest) -> UpdateLitterCommand {
        UpdateLitterCommand {
            name: request.name,
            mother: ParentFields {
                member_id: request.mother_id,
                external_name: request.external_mother_name,
            },
            father: ParentFields {
                member_id: request.father_id,
                external_name: request.external_father_name,
            },
            birth_date: request.birth_date,
            available_date: request.available_date,
            profile_image: request.profile_image,
        }
    }

    /// Converts a litter view (aggregate plus derived values) to the wire DTO
    pub fn to_dto(view: LitterView) -> SharedLitter {
        let litter = view.litter.litter;
        SharedLitter {
            id: litter.id,
            name: litter.name,
            mother_id: litter.mother.member_id,
            father_id: litter.father.member_id,
            mother_name: litter.mother.display_name,
            father_name: litter.father.display_name,
            birth_date: litter.birth_date.format("%Y-%m-%d").to_string(),
            available_date: litter.available_date.format("%Y-%m-%d").to_string(),
            birth_framing: DateFraming {
                label: view.birth_framing.label().to_string(),
                date: view.birth_framing.date().format("%Y-%m-%d").to_string(),
            },
            profile_image: litter.profile_image,
            classification: view.classification,
            puppies: view.litter.puppies.into_iter().map(PuppyMapper::to_dto).collect(),
            created_at: litter.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: litter.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_list_dto(views: Vec<LitterView>) -> LitterListResponse {
        LitterListResponse {
            litters: views.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_litter_response_dto(view: LitterView, message: &str) -> LitterResponse {
        LitterResponse {
            litter: Self::to_dto(view),
            success_message: message.to_string(),
        }
    }

    pub fn to_delete_dto(result: DeleteLitterResult) -> DeleteLitterResponse {
        DeleteLitterResponse {
            success_message: format!(
                "Litter deleted along with {} puppies",
                result.deleted_puppies
            ),
            litter_id: result.litter_id,
            deleted_puppies: result.deleted_puppies,
            released_images: result.released_images,
        }
    }
}
