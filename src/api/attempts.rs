//! Attempt log audit endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::attempt_log::NotificationAttempt;
use crate::error::{AppError, Result};
use crate::server::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct AttemptQuery {
    pub comment_id: Option<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AttemptListResponse {
    pub attempts: Vec<NotificationAttempt>,
    pub total: usize,
}

/// GET /api/v1/attempts - Newest attempts first
#[tracing::instrument(name = "http.list_attempts", skip(state))]
pub async fn list_attempts(
    State(state): State<AppState>,
    Query(query): Query<AttemptQuery>,
) -> Result<Json<AttemptListResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(AppError::Validation("limit must be positive".to_string()));
    }

    let attempts = state
        .attempt_log
        .recent(query.comment_id, limit.min(MAX_LIMIT))
        .await?;
    let total = attempts.len();

    Ok(Json(AttemptListResponse { attempts, total }))
}
