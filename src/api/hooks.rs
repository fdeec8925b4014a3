//! Comment hook endpoints called by the host blog.
//!
//! Both respond 200 with the comment exactly as received, whatever the
//! notification outcome, so the host can continue its own processing.

use axum::{extract::State, Json};

use crate::comment::{Comment, CommentCreated, CommentEdited};
use crate::server::AppState;

/// POST /api/v1/hooks/comment-created
#[tracing::instrument(
    name = "http.comment_created",
    skip(state, event),
    fields(coid = event.comment.coid, cid = event.comment.cid)
)]
pub async fn comment_created(
    State(state): State<AppState>,
    Json(event): Json<CommentCreated>,
) -> Json<Comment> {
    let comment = state
        .hooks
        .on_comment_created(event.comment, event.post_title.as_deref())
        .await;

    Json(comment)
}

/// POST /api/v1/hooks/comment-edited
#[tracing::instrument(
    name = "http.comment_edited",
    skip(state, event),
    fields(coid = event.comment.coid, previous_status = ?event.previous_status)
)]
pub async fn comment_edited(
    State(state): State<AppState>,
    Json(event): Json<CommentEdited>,
) -> Json<Comment> {
    let comment = state
        .hooks
        .on_comment_edited(
            event.comment,
            event.previous_status,
            event.post_title.as_deref(),
        )
        .await;

    Json(comment)
}
