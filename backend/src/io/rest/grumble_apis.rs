//! # REST API for the Grumble
//!
//! The kennel's breeding stock. Listing and reading members is public; edits
//! are admin only. Deleting a member that is still recorded as a litter parent
//! follows the configured parent delete policy.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateGrumbleMemberRequest, DeleteResponse, UpdateGrumbleMemberRequest};
use tracing::info;

use crate::io::rest::auth::AdminGuard;
use crate::io::rest::mappers::GrumbleMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/:member_id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

pub async fn list_members(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/grumble");

    match state.grumble_service.list_members().await {
        Ok(members) => (StatusCode::OK, Json(GrumbleMapper::to_list_dto(members))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/grumble/{}", member_id);

    match state.grumble_service.get_member(&member_id).await {
        Ok(member) => (StatusCode::OK, Json(GrumbleMapper::to_dto(member))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_member(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(request): Json<CreateGrumbleMemberRequest>,
) -> impl IntoResponse {
    info!("POST /api/grumble - request: {:?}", request);

    let command = GrumbleMapper::to_create_command(request);
    match state.grumble_service.create_member(command).await {
        Ok(member) => {
            let response = GrumbleMapper::to_member_response_dto(member, "Grumble member created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_member(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Json(request): Json<UpdateGrumbleMemberRequest>,
) -> impl IntoResponse {
    info!("PUT /api/grumble/{} - request: {:?}", member_id, request);

    let command = GrumbleMapper::to_update_command(request);
    match state.grumble_service.update_member(&member_id, command).await {
        Ok(member) => {
            let response = GrumbleMapper::to_member_response_dto(member, "Grumble member updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn delete_member(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/grumble/{}", member_id);

    match state.grumble_service.delete_member(&member_id).await {
        Ok(result) => {
            let success_message = if result.detached_litters > 0 {
                format!(
                    "Grumble member deleted; {} litter(s) now record the parent by name",
                    result.detached_litters
                )
            } else {
                "Grumble member deleted successfully".to_string()
            };
            (StatusCode::OK, Json(DeleteResponse { success_message })).into_response()
        }
        Err(e) => e.into_response(),
    }
}
