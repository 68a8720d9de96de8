use chrono::SecondsFormat;
use shared::{
    AddPuppiesRequest, CreatePuppyRequest, Puppy as SharedPuppy, PuppyBatchResponse, PuppyResponse,
    UpdatePuppyRequest,
};

use crate::domain::commands::puppies::{CreatePuppyCommand, UpdatePuppyCommand};
use crate::domain::models::puppy::DomainPuppy;

/// Mapper between puppy DTOs and domain puppies
pub struct PuppyMapper;

impl PuppyMapper {
    pub fn to_create_command(request: CreatePuppyRequest) -> CreatePuppyCommand {
        CreatePuppyCommand {
            name: request.name,
            color: request.color,
            gender: request.gender,
            status: request.status,
            price: request.price,
            description: request.description,
            profile_image: request.profile_image,
        }
    }

    pub fn to_batch_commands(request: AddPuppiesRequest) -> Vec<CreatePuppyCommand> {
        request.puppies.into_iter().map(Self::to_create_command).collect()
    }

    pub fn to_update_command(request: UpdatePuppyRequest) -> UpdatePuppyCommand {
        UpdatePuppyCommand {
            name: request.name,
            color: request.color,
            gender: request.gender,
            status: request.status,
            price: request.price,
            clear_price: request.clear_price,
            description: request.description,
            profile_image: request.profile_image,
        }
    }

    pub fn to_dto(domain: DomainPuppy) -> SharedPuppy {
        SharedPuppy {
            id: domain.id,
            litter_id: domain.litter_id,
            name: domain.name,
            color: domain.color,
            gender: domain.gender,
            status: domain.status,
            price: domain.price,
            description: domain.description,
            profile_image: domain.profile_image,
            created_at: domain.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            updated_at: domain.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_puppy_response_dto(domain: DomainPuppy, message: &str) -> PuppyResponse {
        PuppyResponse {
            puppy: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }

    pub fn to_batch_response_dto(puppies: Vec<DomainPuppy>) -> PuppyBatchResponse {
        let count = puppies.len();
        PuppyBatchResponse {
            puppies: puppies.into_iter().map(Self::to_dto).collect(),
            success_message: format!("Added {} puppies", count),
        }
    }
}
