use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use pose_kinematics_wasm::{compute_metrics, BiomechanicsMetrics, BiomechanicsPayload, Landmark};
use serde::{Deserialize, Serialize};

use crate::coaching::feedback::detect_issues;
use crate::extractors::JsonBody;
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::validation::validate_payload;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(save_biomechanics))
        .route("/analyze", post(analyze_landmarks))
        .route("/:assessment_id", get(get_biomechanics))
}

/// 浏览器端控制器推送的指标；覆盖写入
async fn save_biomechanics(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<BiomechanicsPayload>,
) -> Result<impl IntoResponse, AppError> {
    validate_payload(&payload)?;
    let record = state.store().upsert_biomechanics(&payload, Utc::now())?;
    tracing::info!(
        assessment_id = record.assessment_id,
        arm_slot_angle = ?record.metrics.arm_slot_angle,
        knee_flexion = ?record.metrics.knee_flexion,
        torque_separation = ?record.metrics.torque_separation,
        "Biomechanics metrics persisted"
    );
    Ok(created(record))
}

async fn get_biomechanics(
    State(state): State<AppState>,
    Path(assessment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if assessment_id <= 0 {
        return Err(AppError::bad_request(
            "INVALID_ASSESSMENT_ID",
            "assessmentId must be a positive integer",
        ));
    }
    let record = state
        .store()
        .get_biomechanics(assessment_id)?
        .ok_or_else(|| {
            AppError::not_found(&format!(
                "No biomechanics record for assessment {assessment_id}"
            ))
        })?;
    Ok(ok(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    landmarks: Vec<Landmark>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    metrics: Option<BiomechanicsMetrics>,
    issues: Vec<String>,
}

/// 离线片段：对一帧关键点计算指标并给出规则问题
async fn analyze_landmarks(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AnalyzeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let metrics = compute_metrics(&req.landmarks);
    let issues = metrics
        .as_ref()
        .map(|m| detect_issues(m, &state.config().coaching.feedback))
        .unwrap_or_default();
    tracing::debug!(
        landmark_count = req.landmarks.len(),
        has_metrics = metrics.is_some(),
        issues = issues.len(),
        "Landmarks analyzed"
    );
    Ok(ok(AnalyzeResponse { metrics, issues }))
}
