use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::response::AppError;
use crate::state::AppState;
use crate::store::migrate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/database", get(database_health))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store().ping().is_ok();
    Json(serde_json::json!({
        "status": if store_healthy { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": state.uptime_secs(),
        "store": { "healthy": store_healthy },
        "llm": {
            "enabled": state.llm().is_enabled(),
            "mock": state.llm().is_mock(),
        },
    }))
}

async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// 迁移全部完成且知识库非空才算就绪
async fn readiness(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let version = migrate::get_current_version(state.store())?;
    if version < migrate::latest_version() {
        return Err(AppError::service_unavailable(
            "NOT_READY",
            "Store migrations are still pending",
        ));
    }
    if state.store().count_drills() == 0 {
        return Err(AppError::service_unavailable(
            "NOT_READY",
            "Drill knowledge base is empty",
        ));
    }
    Ok(StatusCode::OK)
}

async fn database_health(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let ping = state.store().ping();
    let latency_us = start.elapsed().as_micros() as u64;

    if let Err(e) = &ping {
        tracing::error!(error = %e, "Store health probe failed");
    }

    Json(serde_json::json!({
        "healthy": ping.is_ok(),
        "latencyUs": latency_us,
        "schemaVersion": migrate::get_current_version(state.store()).ok(),
        "sizeOnDiskBytes": state.store().size_on_disk().ok(),
        "biomechanicsRecords": state.store().count_biomechanics(),
        "drills": state.store().count_drills(),
    }))
}
