// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::postgres;

// Domain layer (business logic)
pub mod attempt_log;
pub mod comment;
pub mod gateway;
pub mod notification;
pub mod options;
pub mod policy;
pub mod template;

// Application layer
pub mod api;
pub mod hooks;
pub mod server;

// Supporting modules
pub mod telemetry;
