//! # REST API for Kennel Settings
//!
//! Currently a single switch: whether the public waitlist accepts new
//! registrations.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use shared::SettingsResponse;
use tracing::info;

use crate::io::rest::auth::AdminGuard;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/waitlist/toggle", post(toggle_waitlist))
}

/// Public so the registration form can tell whether the waitlist is open
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/settings");

    match state.settings_service.waitlist_enabled().await {
        Ok(waitlist_enabled) => (StatusCode::OK, Json(SettingsResponse { waitlist_enabled })).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_settings(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(request): Json<SettingsResponse>,
) -> impl IntoResponse {
    info!("PUT /api/settings - request: {:?}", request);

    match state
        .settings_service
        .set_waitlist_enabled(request.waitlist_enabled)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(request)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn toggle_waitlist(_admin: AdminGuard, State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/settings/waitlist/toggle");

    match state.settings_service.toggle_waitlist().await {
        Ok(waitlist_enabled) => (StatusCode::OK, Json(SettingsResponse { waitlist_enabled })).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{empty_request, json_request, read_json, test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use shared::SettingsResponse;
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_waitlist_open_by_default() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(empty_request("GET", "/api/settings", false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let settings: SettingsResponse = read_json(response).await;
        assert!(settings.waitlist_enabled);
    }

    #[tokio::test]
    async fn test_toggle_and_set() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/settings/waitlist/toggle", true))
            .await
            .unwrap();
        let settings: SettingsResponse = read_json(response).await;
        assert!(!settings.waitlist_enabled);

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/settings", json!({ "waitlist_enabled": true }), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/settings", json!({ "waitlist_enabled": true }), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request("GET", "/api/settings", false))
            .await
            .unwrap();
        let settings: SettingsResponse = read_json(response).await;
        assert!(settings.waitlist_enabled);
    }
}
