//! PostgreSQL persistence module.
//!
//! Provides the connection pool backing the PostgreSQL attempt log.

pub mod pool;

pub use pool::{PostgresPool, PostgresPoolError};
