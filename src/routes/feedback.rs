use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use pose_kinematics_wasm::BiomechanicsMetrics;
use serde::Deserialize;

use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::coaching::{compose_feedback, FeedbackInput};
use crate::state::AppState;
use crate::validation::{
    parse_athlete_level, parse_skill_category, validate_issue_list, validate_metrics,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_feedback))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    metrics: Option<BiomechanicsMetrics>,
    #[serde(default)]
    detected_issues: Vec<String>,
    skill_category: String,
    athlete_level: String,
}

async fn create_feedback(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = parse_skill_category(&req.skill_category)?;
    let level = parse_athlete_level(&req.athlete_level)?;
    validate_issue_list(&req.detected_issues)?;
    if let Some(metrics) = &req.metrics {
        validate_metrics(metrics)?;
    }

    let report = compose_feedback(
        state.store(),
        state.llm(),
        &state.config().coaching,
        FeedbackInput {
            metrics: req.metrics.as_ref(),
            detected_issues: &req.detected_issues,
            category,
            level,
        },
    )
    .await?;

    tracing::info!(
        category = %category,
        level = %level,
        issues = report.issues.len(),
        recommendations = report.recommendations.len(),
        "Feedback generated"
    );
    Ok(ok(report))
}
