//! Health and routing smoke tests. No database required.

use http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn test_health_returns_ok() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_without_token_is_rejected() {
    let app = TestApp::new();
    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status.is_client_error(),
        "expected 4xx, got {}",
        response.status
    );
}
