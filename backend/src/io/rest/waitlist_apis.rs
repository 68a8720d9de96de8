//! # REST API for the Waitlist
//!
//! Customers register and look up their place in line without an account;
//! the phone number is their identity. Listing and managing entries is admin
//! only.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use shared::{DeleteResponse, JoinWaitlistRequest, UpdateWaitlistEntryRequest};
use tracing::info;

use crate::io::rest::auth::AdminGuard;
use crate::io::rest::mappers::WaitlistMapper;
use crate::AppState;

/// Query parameters for the position lookup
#[derive(Deserialize, Debug)]
pub struct PositionQuery {
    pub phone: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(join_waitlist))
        .route("/position", get(get_position))
        .route(
            "/:entry_id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

/// Public registration
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(request): Json<JoinWaitlistRequest>,
) -> impl IntoResponse {
    // the phone number stays out of the logs
    info!(
        "POST /api/waitlist - gender: {:?}, color: {:?}",
        request.gender_preference, request.color_preference
    );

    let command = WaitlistMapper::to_join_command(request);
    match state.waitlist_service.enqueue(command).await {
        Ok(entry) => {
            let response = WaitlistMapper::to_entry_response_dto(entry, "You have been added to the waitlist");
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Public lookup of every place in line held by a phone number
pub async fn get_position(
    State(state): State<AppState>,
    Query(query): Query<PositionQuery>,
) -> impl IntoResponse {
    info!("GET /api/waitlist/position");

    match state.waitlist_service.position_of(&query.phone).await {
        Ok(result) => (StatusCode::OK, Json(WaitlistMapper::to_position_dto(result))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_entries(_admin: AdminGuard, State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/waitlist");

    match state.waitlist_service.list_ranked().await {
        Ok(ranked) => (StatusCode::OK, Json(WaitlistMapper::to_list_dto(ranked))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_entry(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/waitlist/{}", entry_id);

    match state.waitlist_service.get_entry(&entry_id).await {
        Ok(entry) => (StatusCode::OK, Json(WaitlistMapper::to_dto(entry))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_entry(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
    Json(request): Json<UpdateWaitlistEntryRequest>,
) -> impl IntoResponse {
    info!("PUT /api/waitlist/{} - request: {:?}", entry_id, request);

    let command = WaitlistMapper::to_update_command(request);
    match state.waitlist_service.update_entry(&entry_id, command).await {
        Ok(entry) => {
            let response = WaitlistMapper::to_entry_response_dto(entry, "Waitlist entry updated successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn delete_entry(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(entry_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/waitlist/{}", entry_id);

    match state.waitlist_service.delete_entry(&entry_id).await {
        Ok(()) => {
            let response = DeleteResponse {
                success_message: "Waitlist entry deleted successfully".to_string(),
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
    use shared::{
        ColorPreference, ErrorResponse, Gender, WaitlistEntryResponse, WaitlistListResponse,
        WaitlistPositionResponse, WaitlistStatus,
    };
    use tower::util::ServiceExt; // for `oneshot`

    async fn join(app: &Router, name: &str, phone: &str, gender: &str, color: Option<&str>) -> StatusCode {
        let body = json!({
            "name": name,
            "phone": phone,
            "gender_preference": gender,
            "color_preference": color
        });
        app.clone()
            .oneshot(json_request("POST", "/api/waitlist", body, false))
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_join_and_lookup_position() {
        let (app, _) = test_app().await;

        assert_eq!(join(&app, "Ann", "555-111-2222", "female", None).await, StatusCode::CREATED);
        assert_eq!(join(&app, "Bo", "(555) 333-4444", "female", Some("black")).await, StatusCode::CREATED);
        assert_eq!(join(&app, "Bo", "15553334444", "male", None).await, StatusCode::CREATED);

        let response = app
            .oneshot(empty_request("GET", "/api/waitlist/position?phone=555.333.4444", false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let lookup: WaitlistPositionResponse = read_json(response).await;
        assert!(lookup.found);
        assert_eq!(lookup.positions.len(), 2);
        assert_eq!(lookup.positions[0].segment, Gender::Male);
        assert_eq!(lookup.positions[0].rank, 1);
        assert_eq!(lookup.positions[1].segment, Gender::Female);
        assert_eq!(lookup.positions[1].color_preference, ColorPreference::Black);
        assert_eq!(lookup.positions[1].rank, 2);
        assert_eq!(
            lookup.message,
            "Male Waitlist:\n  #1 (any color)\n\nFemale Waitlist:\n  #2 (black)"
        );
    }

    #[tokio::test]
    async fn test_lookup_unknown_phone() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(empty_request("GET", "/api/waitlist/position?phone=5559990000", false))
            .await
            .unwrap();
        let lookup: WaitlistPositionResponse = read_json(response).await;
        assert!(!lookup.found);
        assert_eq!(lookup.message, "No registrations found for this phone number.");
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (app, _) = test_app().await;

        assert_eq!(join(&app, "Ann", "5551112222", "female", Some("fawn")).await, StatusCode::CREATED);

        let body = json!({
            "name": "Ann again",
            "phone": "1-555-111-2222",
            "gender_preference": "female",
            "color_preference": "fawn"
        });
        let response = app
            .oneshot(json_request("POST", "/api/waitlist", body, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ErrorResponse = read_json(response).await;
        assert_eq!(error.error, "duplicate_entry");
        assert_eq!(error.message, "You are already on the waitlist for fawn female.");
    }

    #[tokio::test]
    async fn test_bad_phone_is_rejected() {
        let (app, _) = test_app().await;
        assert_eq!(join(&app, "Ann", "555-1234", "female", None).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_manages_entries() {
        let (app, _) = test_app().await;
        join(&app, "Ann", "5551112222", "male", None).await;

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/waitlist", false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/waitlist", true))
            .await
            .unwrap();
        let listed: WaitlistListResponse = read_json(response).await;
        assert_eq!(listed.entries.len(), 1);
        assert_eq!(listed.entries[0].rank, 1);
        assert_eq!(listed.entries[0].entry.phone, "555-111-2222");
        let entry_uri = format!("/api/waitlist/{}", listed.entries[0].entry.id);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &entry_uri,
                json!({ "status": "contacted", "notes": "Called Tuesday" }),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: WaitlistEntryResponse = read_json(response).await;
        assert_eq!(updated.entry.status, WaitlistStatus::Contacted);
        assert_eq!(updated.entry.notes, "Called Tuesday");

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &entry_uri, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", &entry_uri, true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_closed_waitlist_rejects_registration() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/settings/waitlist/toggle", true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert_eq!(join(&app, "Ann", "5551112222", "male", None).await, StatusCode::FORBIDDEN);
    }
}
