mod common;

use axum::http::{Method, StatusCode};

use common::app::spawn_test_server_with_limit;
use common::http::{assert_json_error, request, response_json};

#[tokio::test]
async fn it_rate_limit_triggers_429_with_headers() {
    let app = spawn_test_server_with_limit(3).await;

    let mut final_status = StatusCode::OK;
    let mut final_headers = axum::http::HeaderMap::new();
    let mut final_body = serde_json::Value::Null;

    for _ in 0..4 {
        let response = request(&app.app, Method::GET, "/api/drills", None, &[]).await;
        let (status, headers, body) = response_json(response).await;
        final_status = status;
        final_headers = headers;
        final_body = body;
    }

    assert_eq!(final_status, StatusCode::TOO_MANY_REQUESTS);
    assert_json_error(&final_body, "RATE_LIMITED");
    assert!(final_headers.get("retry-after").is_some());
    assert_eq!(final_headers["ratelimit-limit"], "3");
    assert_eq!(final_headers["ratelimit-remaining"], "0");
    assert!(final_headers.get("ratelimit-reset").is_some());
}

#[tokio::test]
async fn it_health_is_not_rate_limited() {
    let app = spawn_test_server_with_limit(1).await;

    for _ in 0..3 {
        let response = request(&app.app, Method::GET, "/health/live", None, &[]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("ratelimit-limit").is_none());
    }
}
