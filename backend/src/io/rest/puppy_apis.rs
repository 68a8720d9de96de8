//! # REST API for Puppies
//!
//! Puppies only exist inside a litter, so every route is nested under the
//! owning litter's ID. All routes are admin only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{post, put},
    Router,
};
use shared::{AddPuppiesRequest, CreatePuppyRequest, DeleteResponse, UpdatePuppyRequest};
use tracing::info;

use crate::io::rest::auth::AdminGuard;
use crate::io::rest::mappers::PuppyMapper;
use crate::AppState;

/// Create a router for puppy APIs. Merged into the litters router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:litter_id/puppies", post(add_puppy))
        .route("/:litter_id/puppies/batch", post(add_puppies))
        .route(
            "/:litter_id/puppies/:puppy_id",
            put(update_puppy).delete(delete_puppy),
        )
}

pub async fn add_puppy(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(litter_id): Path<String>,
    Json(request): Json<CreatePuppyRequest>,
) -> impl IntoResponse {
    info!("POST /api/litters/{}/puppies - request: {:?}", litter_id, request);

    let command = PuppyMapper::to_create_command(request);
    match state.puppy_service.add_puppy(&litter_id, command).await {
        Ok(puppy) => {
            let response = PuppyMapper::to_puppy_response_dto(puppy, "Puppy added successfully");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Add several puppies at once. Either all of them are stored or none are.
pub async fn add_puppies(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(litter_id): Path<String>,
    Json(request): Json<AddPuppiesRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/litters/{}/puppies/batch - {} puppies",
        litter_id,
        request.puppies.len()
    );

    let commands = PuppyMapper::to_batch_commands(request);
    match state.puppy_service.add_puppies(&litter_id, commands).await {
        Ok(puppies) => {
            (StatusCode::CREATED, Json(PuppyMapper::to_batch_response_dto(puppies))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_puppy(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path((litter_id, puppy_id)): Path<(String, String)>,
    Json(request): Json<UpdatePuppyRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/litters/{}/puppies/{} - request: {:?}",
        litter_id, puppy_id, request
    );

    let command = PuppyMapper::to_update_command(request);
    match state.puppy_service.update_puppy(&litter_id, &puppy_id, command).await {
        Ok(puppy) => {
            let response = PuppyMapper::to_puppy_response_dto(puppy, "Puppy updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn delete_puppy(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path((litter_id, puppy_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/litters/{}/puppies/{}", litter_id, puppy_id);

    match state.puppy_service.delete_puppy(&litter_id, &puppy_id).await {
        Ok(()) => {
            let response = DeleteResponse {
                success_message: "Puppy deleted successfully".to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{empty_request, json_request, read_json, test_app};
    use axum::{http::StatusCode, Router};
    use serde_json::json;
    use shared::{ErrorResponse, Litter, LitterResponse, PuppyBatchResponse, PuppyResponse, PuppyStatus};
    use tower::util::ServiceExt; // for `oneshot`

    async fn create_litter(app: &Router) -> String {
        let body = json!({
            "name": "Clover",
            "external_mother_name": "Daisy",
            "external_father_name": "Otis",
            "birth_date": "2024-05-01",
            "available_date": "2024-07-01"
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/litters", body, true))
            .await
            .unwrap();
        let created: LitterResponse = read_json(response).await;
        created.litter.id
    }

    #[tokio::test]
    async fn test_batch_add_is_all_or_nothing() {
        let (app, _) = test_app().await;
        let litter_id = create_litter(&app).await;

        let body = json!({
            "puppies": [
                { "name": "Biscuit", "color": "fawn", "gender": "male" },
                { "name": "Mochi", "color": "brindle", "gender": "female" }
            ]
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", &format!("/api/litters/{}/puppies/batch", litter_id), body, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/litters/{}", litter_id), false))
            .await
            .unwrap();
        let litter: Litter = read_json(response).await;
        assert!(litter.puppies.is_empty());
    }

    #[tokio::test]
    async fn test_batch_add() {
        let (app, _) = test_app().await;
        let litter_id = create_litter(&app).await;

        let body = json!({
            "puppies": [
                { "name": "Biscuit", "color": "fawn", "gender": "male", "price": 2500.0 },
                { "name": "Mochi", "color": "black", "gender": "female" }
            ]
        });
        let response = app
            .oneshot(json_request("POST", &format!("/api/litters/{}/puppies/batch", litter_id), body, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let added: PuppyBatchResponse = read_json(response).await;
        assert_eq!(added.puppies.len(), 2);
        assert!(added.puppies.iter().all(|p| p.litter_id == litter_id));
        assert!(added.puppies.iter().all(|p| p.status == PuppyStatus::Available));
    }

    #[tokio::test]
    async fn test_add_to_missing_litter_is_not_found() {
        let (app, _) = test_app().await;

        let body = json!({ "name": "Biscuit", "color": "fawn", "gender": "male" });
        let response = app
            .oneshot(json_request("POST", "/api/litters/litter::0::missing/puppies", body, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.error, "not_found");
    }

    #[tokio::test]
    async fn test_update_then_delete_puppy() {
        let (app, store) = test_app().await;
        store.add("biscuit.jpg");
        let litter_id = create_litter(&app).await;

        let body = json!({
            "name": "Biscuit", "color": "fawn", "gender": "male", "profile_image": "biscuit.jpg"
        });
        let response = app
            .clone()
            .oneshot(json_request("POST", &format!("/api/litters/{}/puppies", litter_id), body, true))
            .await
            .unwrap();
        let added: PuppyResponse = read_json(response).await;
        let puppy_uri = format!("/api/litters/{}/puppies/{}", litter_id, added.puppy.id);

        let response = app
            .clone()
            .oneshot(json_request("PUT", &puppy_uri, json!({ "status": "Reserved" }), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: PuppyResponse = read_json(response).await;
        assert_eq!(updated.puppy.status, PuppyStatus::Reserved);
        assert_eq!(updated.puppy.name, "Biscuit");

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &puppy_uri, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &puppy_uri, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!store.contains("biscuit.jpg"));

        let response = app
            .oneshot(empty_request("DELETE", &puppy_uri, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
