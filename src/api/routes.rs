use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::attempts::list_attempts;
use super::health::health;
use super::hooks::{comment_created, comment_edited};
use super::metrics::prometheus_metrics;
use super::notifications::test_notification;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Host comment hooks
                .route("/hooks/comment-created", post(comment_created))
                .route("/hooks/comment-edited", post(comment_edited))
                // Admin
                .route("/notifications/test", post(test_notification))
                .route("/attempts", get(list_attempts))
                .layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
