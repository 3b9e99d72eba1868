use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use crate::coaching::drill_scorer::recommend_drills;
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::{
    clamp_limit, parse_athlete_level, parse_skill_category, validate_issue_list,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drills))
        .route("/recommendations", post(recommendations))
        .route("/:id", get(get_drill))
}

#[derive(Debug, Deserialize)]
struct ListDrillsQuery {
    category: Option<String>,
}

async fn list_drills(
    State(state): State<AppState>,
    Query(query): Query<ListDrillsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let drills = match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(raw) => {
            let category = parse_skill_category(raw)?;
            state.store().list_drills_by_category(category.as_str())?
        }
        None => state.store().list_drills()?,
    };
    Ok(ok(drills))
}

async fn get_drill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let drill = state
        .store()
        .get_drill(&id)?
        .ok_or_else(|| AppError::not_found(&format!("Drill not found: {id}")))?;
    Ok(ok(drill))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationRequest {
    #[serde(default)]
    detected_issues: Vec<String>,
    skill_category: String,
    athlete_level: String,
    limit: Option<usize>,
}

async fn recommendations(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RecommendationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let category = parse_skill_category(&req.skill_category)?;
    let level = parse_athlete_level(&req.athlete_level)?;
    validate_issue_list(&req.detected_issues)?;
    let limit = clamp_limit(
        req.limit,
        state.config().coaching.recommendation_default_limit,
    );

    let drills = state.store().list_drills_by_category(category.as_str())?;
    let ranked = recommend_drills(&drills, &req.detected_issues, category, level, limit);
    Ok(ok(ranked))
}
