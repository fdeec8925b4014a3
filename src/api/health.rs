use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub attempt_log: AttemptLogHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealth>,
}

#[derive(Debug, Serialize)]
pub struct AttemptLogHealth {
    pub backend: String,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealth {
    pub pool_size: u32,
    pub idle_connections: u32,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = state.postgres_pool.as_ref().map(|pool| {
        let inner_pool = pool.pool();
        PostgresHealth {
            pool_size: inner_pool.size(),
            idle_connections: inner_pool.num_idle() as u32,
        }
    });

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        attempt_log: AttemptLogHealth {
            backend: state.attempt_log.backend_type().to_string(),
        },
        postgres,
    })
}
