//! Backend trait for the notification attempt log.
//!
//! Writes are best-effort: implementations log and swallow their own
//! persistence errors so a broken log never interrupts a dispatch. Only the
//! read side reports errors.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by attempt-log reads and schema setup.
#[derive(Debug, Error)]
pub enum AttemptLogError {
    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Backend is temporarily unavailable
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Lifecycle of one attempt row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Sending,
    Success,
    Failure,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Sending => "sending",
            AttemptStatus::Success => "success",
            AttemptStatus::Failure => "failure",
        }
    }

    pub fn terminal(success: bool) -> Self {
        if success {
            AttemptStatus::Success
        } else {
            AttemptStatus::Failure
        }
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the attempt log.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct NotificationAttempt {
    pub id: i64,

    /// `None` when the comment had no id yet
    pub comment_id: Option<i64>,

    pub title: String,
    pub body: String,

    /// `sending`, then `success` or `failure`
    pub status: String,

    pub created_at: DateTime<Utc>,
}

/// Storage for notification attempts.
#[async_trait]
pub trait AttemptLog: Send + Sync {
    /// Backend type identifier
    fn backend_type(&self) -> &'static str;

    /// Create whatever storage the backend needs. Idempotent.
    async fn prepare(&self) -> Result<(), AttemptLogError> {
        Ok(())
    }

    /// Append a `sending` row. Returns the new row id, or `None` when the
    /// write failed.
    async fn record_start(&self, comment_id: i64, title: &str, body: &str) -> Option<i64>;

    /// Mark the newest row for `comment_id` as `success` or `failure`.
    /// No-op for non-positive comment ids.
    async fn record_outcome(&self, comment_id: i64, success: bool);

    /// Newest rows first, optionally restricted to one comment.
    async fn recent(
        &self,
        comment_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<NotificationAttempt>, AttemptLogError>;
}

/// Comment ids of zero or below are stored as NULL.
pub(crate) fn stored_comment_id(comment_id: i64) -> Option<i64> {
    (comment_id > 0).then_some(comment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(AttemptStatus::Sending.as_str(), "sending");
        assert_eq!(AttemptStatus::terminal(true), AttemptStatus::Success);
        assert_eq!(AttemptStatus::terminal(false).to_string(), "failure");
    }

    #[test]
    fn test_stored_comment_id() {
        assert_eq!(stored_comment_id(7), Some(7));
        assert_eq!(stored_comment_id(0), None);
        assert_eq!(stored_comment_id(-3), None);
    }
}
