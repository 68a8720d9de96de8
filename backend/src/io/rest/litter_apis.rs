//! # REST API for Litters
//!
//! Public reads of the litter catalogue (all, current, past, single) and the
//! admin endpoints that create, edit and delete litters.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{CreateLitterRequest, LitterClassification, UpdateLitterRequest};
use tracing::info;

use crate::io::rest::auth::AdminGuard;
use crate::io::rest::mappers::LitterMapper;
use crate::AppState;

/// Create a router for litter related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_litters).post(create_litter))
        .route("/current", get(list_current_litters))
        .route("/past", get(list_past_litters))
        .route(
            "/:litter_id",
            get(get_litter).put(update_litter).delete(delete_litter),
        )
}

/// List every litter with its puppies
pub async fn list_litters(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/litters");

    match state.litter_service.list_litters().await {
        Ok(views) => (StatusCode::OK, Json(LitterMapper::to_list_dto(views))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Litters with at least one puppy still available
pub async fn list_current_litters(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/litters/current");

    match state
        .litter_service
        .list_by_classification(LitterClassification::Current)
        .await
    {
        Ok(views) => (StatusCode::OK, Json(LitterMapper::to_list_dto(views))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_past_litters(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/litters/past");

    match state
        .litter_service
        .list_by_classification(LitterClassification::Past)
        .await
    {
        Ok(views) => (StatusCode::OK, Json(LitterMapper::to_list_dto(views))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_litter(
    State(state): State<AppState>,
    Path(litter_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/litters/{}", litter_id);

    match state.litter_service.get_litter(&litter_id).await {
        Ok(view) => (StatusCode::OK, Json(LitterMapper::to_dto(view))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_litter(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(request): Json<CreateLitterRequest>,
) -> impl IntoResponse {
    info!("POST /api/litters - request: {:?}", request);

    let command = LitterMapper::to_create_command(request);
    match state.litter_service.create_litter(command).await {
        Ok(view) => {
            let response = LitterMapper::to_litter_response_dto(view, "Litter created successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_litter(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(litter_id): Path<String>,
    Json(request): Json<UpdateLitterRequest>,
) -> impl IntoResponse {
    info!("PUT /api/litters/{} - request: {:?}", litter_id, request);

    let command = LitterMapper::to_update_command(request);
    match state.litter_service.update_litter(&litter_id, command).await {
        Ok(view) => {
            let response = LitterMapper::to_litter_response_dto(view, "Litter updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Delete a litter together with its puppies and their images
pub async fn delete_litter(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(litter_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/litters/{}", litter_id);

    match state.litter_service.delete_litter(&litter_id).await {
        Ok(result) => (StatusCode::OK, Json(LitterMapper::to_delete_dto(result))).into_response(),
        Err(e) => e.into_response(),
    }
}
