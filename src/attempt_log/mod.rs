//! Notification attempt log.
//!
//! Every triggered dispatch writes one row with status `sending` before the
//! gateway call and updates it to `success` or `failure` afterwards.
//!
//! - `MemoryAttemptLog`: process-local rows (default)
//! - `PostgresAttemptLog`: `apprise_notification_log` table
//!
//! Use `create_attempt_log()` to pick a backend from configuration.

mod backend;
mod memory_backend;
mod postgres_backend;

use std::sync::Arc;

use crate::config::AttemptLogConfig;
use crate::postgres::PostgresPool;

pub use backend::{AttemptLog, AttemptLogError, AttemptStatus, NotificationAttempt};
pub use memory_backend::MemoryAttemptLog;
pub use postgres_backend::PostgresAttemptLog;

/// Create an attempt log backend based on configuration.
///
/// - `"postgres"`: Returns a `PostgresAttemptLog` if a PostgreSQL pool is provided
/// - `"memory"` (default): Returns a `MemoryAttemptLog`
///
/// Call [`AttemptLog::prepare`] on the result before first use.
pub fn create_attempt_log(
    settings: &AttemptLogConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn AttemptLog> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(
                    backend = "postgres",
                    database = %pool.database_url_masked(),
                    "Creating PostgreSQL attempt log"
                );
                Arc::new(PostgresAttemptLog::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL attempt log requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryAttemptLog::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory attempt log");
            Arc::new(MemoryAttemptLog::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_defaults_to_memory() {
        let log = create_attempt_log(&AttemptLogConfig::default(), None);
        assert_eq!(log.backend_type(), "memory");
    }

    #[test]
    fn test_factory_postgres_without_pool_falls_back() {
        let settings = AttemptLogConfig {
            backend: "postgres".to_string(),
        };
        let log = create_attempt_log(&settings, None);
        assert_eq!(log.backend_type(), "memory");
    }
}
