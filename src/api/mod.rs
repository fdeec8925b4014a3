//! API layer - HTTP endpoint handlers organized by domain.

mod attempts;
mod health;
mod hooks;
mod metrics;
mod notifications;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use attempts::{list_attempts, AttemptListResponse, AttemptQuery};
pub use health::{health, HealthResponse};
pub use hooks::{comment_created, comment_edited};
pub use metrics::prometheus_metrics;
pub use notifications::test_notification;
pub use routes::api_routes;
