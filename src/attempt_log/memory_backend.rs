//! In-memory attempt log.
//!
//! Rows live for the lifetime of the process and are never pruned, so this
//! backend suits development and tests; production deployments should use
//! the PostgreSQL backend.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::metrics::AttemptLogMetrics;

use super::backend::{
    stored_comment_id, AttemptLog, AttemptLogError, AttemptStatus, NotificationAttempt,
};

#[derive(Default)]
struct Rows {
    next_id: i64,
    attempts: Vec<NotificationAttempt>,
}

#[derive(Default)]
pub struct MemoryAttemptLog {
    rows: Mutex<Rows>,
}

impl MemoryAttemptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows, oldest first.
    pub fn snapshot(&self) -> Vec<NotificationAttempt> {
        match self.rows.lock() {
            Ok(rows) => rows.attempts.clone(),
            Err(poisoned) => poisoned.into_inner().attempts.clone(),
        }
    }
}

#[async_trait]
impl AttemptLog for MemoryAttemptLog {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn record_start(&self, comment_id: i64, title: &str, body: &str) -> Option<i64> {
        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Attempt log lock poisoned, dropping row");
                AttemptLogMetrics::record_write_error();
                return None;
            }
        };

        rows.next_id += 1;
        let id = rows.next_id;
        rows.attempts.push(NotificationAttempt {
            id,
            comment_id: stored_comment_id(comment_id),
            title: title.to_string(),
            body: body.to_string(),
            status: AttemptStatus::Sending.as_str().to_string(),
            created_at: Utc::now(),
        });

        Some(id)
    }

    async fn record_outcome(&self, comment_id: i64, success: bool) {
        if comment_id <= 0 {
            return;
        }

        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Attempt log lock poisoned, outcome not recorded");
                AttemptLogMetrics::record_write_error();
                return;
            }
        };

        let latest = rows
            .attempts
            .iter_mut()
            .rev()
            .find(|row| row.comment_id == Some(comment_id));

        match latest {
            Some(row) => row.status = AttemptStatus::terminal(success).as_str().to_string(),
            None => tracing::debug!(comment_id, "No attempt row to update"),
        }
    }

    async fn recent(
        &self,
        comment_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<NotificationAttempt>, AttemptLogError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| AttemptLogError::Unavailable(e.to_string()))?;

        Ok(rows
            .attempts
            .iter()
            .rev()
            .filter(|row| comment_id.is_none() || row.comment_id == comment_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_then_outcome() {
        let log = MemoryAttemptLog::new();

        let id = log.record_start(7, "title", "body").await;
        assert_eq!(id, Some(1));
        assert_eq!(log.snapshot()[0].status, "sending");

        log.record_outcome(7, true).await;
        assert_eq!(log.snapshot()[0].status, "success");
    }

    #[tokio::test]
    async fn test_outcome_updates_newest_row_only() {
        let log = MemoryAttemptLog::new();
        log.record_start(7, "first", "b").await;
        log.record_outcome(7, true).await;
        log.record_start(7, "second", "b").await;
        log.record_start(8, "other", "b").await;

        log.record_outcome(7, false).await;

        let rows = log.snapshot();
        assert_eq!(rows[0].status, "success");
        assert_eq!(rows[1].status, "failure");
        assert_eq!(rows[2].status, "sending");
    }

    #[tokio::test]
    async fn test_non_positive_comment_id() {
        let log = MemoryAttemptLog::new();
        log.record_start(0, "t", "b").await;
        log.record_outcome(0, true).await;

        let rows = log.snapshot();
        assert_eq!(rows[0].comment_id, None);
        assert_eq!(rows[0].status, "sending");
    }

    #[tokio::test]
    async fn test_recent_filters_and_limits() {
        let log = MemoryAttemptLog::new();
        for i in 0..5 {
            log.record_start(1 + i % 2, &format!("t{i}"), "b").await;
        }

        let all = log.recent(None, 3).await.unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![5, 4, 3]);

        let only_two = log.recent(Some(2), 10).await.unwrap();
        assert_eq!(only_two.len(), 2);
        assert!(only_two.iter().all(|r| r.comment_id == Some(2)));
    }
}
