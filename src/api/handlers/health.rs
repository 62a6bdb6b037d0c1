use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::application::notifications::{ChannelHandle, SocketNamespace};

/// Running notification channels and socket namespaces, reported by
/// `/health/channels`.
#[derive(Default)]
pub struct LiveStatus {
    pub channels: Vec<ChannelHandle>,
    pub namespaces: Vec<Arc<SocketNamespace>>,
}

impl LiveStatus {
    pub fn shutdown(&self) {
        for channel in &self.channels {
            channel.shutdown();
        }
        info!(channels = self.channels.len(), "Notification channels stopped");
    }
}

/// GET /health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "contract_state_api",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// GET /health/ready
/// Readiness probe with database connectivity check
pub async fn readiness_handler(
    State(pool): State<Arc<PgPool>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let start_time = Instant::now();

    let db_check = tokio::time::timeout(
        Duration::from_secs(2),
        sqlx::query("SELECT 1 as health_check").fetch_one(pool.as_ref()),
    )
    .await;

    let response_time = start_time.elapsed();

    let (status, database) = match db_check {
        Ok(Ok(_)) => (StatusCode::OK, "connected"),
        Ok(Err(e)) => {
            warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "timeout"),
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "service": "contract_state_api",
            "database": database,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "response_time_ms": response_time.as_millis(),
        })),
    )
}

/// GET /health/channels
/// Delivery counters per notification channel and live socket counts
pub async fn channels_handler(
    State(live): State<Arc<LiveStatus>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let channels: Vec<_> = live
        .channels
        .iter()
        .map(|channel| {
            json!({
                "topic": channel.topic().as_str(),
                "running": channel.is_running(),
                "stats": channel.stats(),
            })
        })
        .collect();

    let namespaces: Vec<_> = live
        .namespaces
        .iter()
        .map(|namespace| {
            json!({
                "name": namespace.name(),
                "connected": namespace.connected(),
            })
        })
        .collect();

    let status = if live.channels.iter().all(ChannelHandle::is_running) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "channels": channels,
            "namespaces": namespaces,
        })),
    )
}
