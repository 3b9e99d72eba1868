pub mod biomechanics;
pub mod drills;
pub mod feedback;
pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::Router;

use crate::constants::MAX_BODY_BYTES;
use crate::middleware::{rate_limit, request_id};
use crate::response::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/biomechanics", biomechanics::router())
        .nest("/drills", drills::router())
        .nest("/feedback", feedback::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> impl IntoResponse {
    AppError::not_found("Route not found")
}
