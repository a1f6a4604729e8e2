//! Health check endpoint
//!
//! ```text
//! GET /health
//! ```
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "database": "connected",
//!   "schema_version": 20250101000000,
//!   "pool": { "active_connections": 1, "idle_connections": 4 }
//! }
//! ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use visutask_shared::db::{
    migrations::migration_status,
    pool::{health_check as ping, pool_stats, PoolStats},
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: &'static str,

    pub version: &'static str,

    /// "connected" or "disconnected"
    pub database: &'static str,

    /// Latest applied migration, when the database answers
    pub schema_version: Option<i64>,

    pub pool: PoolStats,
}

/// Always answers 200; a broken database shows up as "degraded"
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = ping(&state.db).await.is_ok();

    let schema_version = if connected {
        migration_status(&state.db)
            .await
            .ok()
            .and_then(|status| status.latest_version)
    } else {
        None
    };

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if connected { "connected" } else { "disconnected" },
        schema_version,
        pool: pool_stats(&state.db),
    })
}
