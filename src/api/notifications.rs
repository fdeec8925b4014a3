use axum::{extract::State, Json};

use crate::notification::TestNotificationResult;
use crate::server::AppState;

/// POST /api/v1/notifications/test - Send a test notification
///
/// Always 200; `success` and `message` carry the result for the admin toast.
#[tracing::instrument(name = "http.test_notification", skip(state))]
pub async fn test_notification(State(state): State<AppState>) -> Json<TestNotificationResult> {
    Json(state.hooks.send_test_notification().await)
}
