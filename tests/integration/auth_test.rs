//! Authentication tests.

use http::StatusCode;
use uuid::Uuid;

use super::helpers::TestApp;

#[tokio::test]
async fn test_missing_authorization_header_is_401() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_bearer_token_is_401() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_wrong_secret_is_401() {
    let app = TestApp::new();

    let other_config = lifelink_core::config::AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        jwt_access_ttl_hours: 1,
        password_min_length: 8,
    };
    let encoder = lifelink_auth::jwt::encoder::JwtEncoder::new(&other_config);
    let (token, _) = encoder
        .generate_access_token(
            Uuid::new_v4(),
            lifelink_entity::user::UserRole::Member,
            "mallory",
        )
        .expect("encode");

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new();
    let body = serde_json::json!({
        "username": "alice",
        "email": "not-an-email",
        "password": "correct-horse-battery",
        "blood_group": "O-",
        "location": { "coordinates": [77.5946, 12.9716], "address": "Test Clinic" },
    });

    let response = app
        .request("POST", "/api/auth/register", Some(body), None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_unknown_blood_group() {
    let app = TestApp::new();
    let body = serde_json::json!({
        "username": "alice",
        "email": "alice@test.com",
        "password": "correct-horse-battery",
        "blood_group": "Z+",
        "location": { "coordinates": [77.5946, 12.9716], "address": "Test Clinic" },
    });

    let response = app
        .request("POST", "/api/auth/register", Some(body), None)
        .await;

    // Enum deserialization fails before the handler runs.
    assert!(response.status.is_client_error());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_register_login_me_roundtrip() {
    let app = TestApp::with_database().await;

    let (user_id, _) = app.register_user("alice", "O-", true).await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "alice",
                "password": "correct-horse-battery",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.body["access_token"].as_str().expect("token");

    let me = app.request("GET", "/api/auth/me", None, Some(token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["id"], user_id.to_string());
    assert_eq!(me.body["data"]["blood_group"], "O-");
    assert!(me.body["data"]["password_hash"].is_null());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_login_with_wrong_password_is_401() {
    let app = TestApp::with_database().await;
    app.register_user("bob", "A+", false).await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": "bob",
                "password": "wrong-password-entirely",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);
}
