//! PostgreSQL-based attempt log.
//!
//! Rows live in `apprise_notification_log`. The table is created on startup if
//! missing and is never dropped, so the log survives reinstalls.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::metrics::AttemptLogMetrics;

use super::backend::{
    stored_comment_id, AttemptLog, AttemptLogError, AttemptStatus, NotificationAttempt,
};

/// Width of the `title` column.
const TITLE_MAX_CHARS: usize = 200;

pub struct PostgresAttemptLog {
    /// PostgreSQL connection pool
    pool: PgPool,
}

impl PostgresAttemptLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Cut `title` to the column width on a char boundary.
fn fit_title(title: &str) -> &str {
    match title.char_indices().nth(TITLE_MAX_CHARS) {
        Some((idx, _)) => &title[..idx],
        None => title,
    }
}

#[async_trait]
impl AttemptLog for PostgresAttemptLog {
    fn backend_type(&self) -> &'static str {
        "postgres"
    }

    async fn prepare(&self) -> Result<(), AttemptLogError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS apprise_notification_log (
                id BIGSERIAL PRIMARY KEY,
                comment_id BIGINT,
                title VARCHAR(200),
                body TEXT,
                status VARCHAR(20),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_apprise_notification_log_comment
            ON apprise_notification_log (comment_id, id DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Attempt log table ready");
        Ok(())
    }

    async fn record_start(&self, comment_id: i64, title: &str, body: &str) -> Option<i64> {
        let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO apprise_notification_log (comment_id, title, body, status, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id
            "#,
        )
        .bind(stored_comment_id(comment_id))
        .bind(fit_title(title))
        .bind(body)
        .bind(AttemptStatus::Sending.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, comment_id, "Failed to record notification attempt");
                AttemptLogMetrics::record_write_error();
                None
            }
        }
    }

    async fn record_outcome(&self, comment_id: i64, success: bool) {
        if comment_id <= 0 {
            return;
        }

        let status = AttemptStatus::terminal(success);
        let result = sqlx::query(
            r#"
            UPDATE apprise_notification_log
            SET status = $1
            WHERE id = (
                SELECT id FROM apprise_notification_log
                WHERE comment_id = $2
                ORDER BY id DESC
                LIMIT 1
            )
            "#,
        )
        .bind(status.as_str())
        .bind(comment_id)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                comment_id,
                status = %status,
                "Failed to update notification attempt status"
            );
            AttemptLogMetrics::record_write_error();
        }
    }

    async fn recent(
        &self,
        comment_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<NotificationAttempt>, AttemptLogError> {
        let rows = sqlx::query_as::<_, NotificationAttempt>(
            r#"
            SELECT id, comment_id,
                   COALESCE(title, '') AS title,
                   COALESCE(body, '') AS body,
                   COALESCE(status, '') AS status,
                   created_at
            FROM apprise_notification_log
            WHERE ($1::BIGINT IS NULL OR comment_id = $1)
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(comment_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_title_short() {
        assert_eq!(fit_title("short"), "short");
    }

    #[test]
    fn test_fit_title_multibyte() {
        let long = "评".repeat(250);
        let fitted = fit_title(&long);
        assert_eq!(fitted.chars().count(), TITLE_MAX_CHARS);
        assert!(long.starts_with(fitted));
    }
}
