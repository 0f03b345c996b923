//! Blood request lifecycle tests.
//!
//! The database-backed scenarios mirror the end-to-end flows: create →
//! respond → fulfill, with the state machine and badge rules asserted
//! along the way.

use http::StatusCode;
use uuid::Uuid;

use super::helpers::TestApp;

fn create_payload() -> serde_json::Value {
    serde_json::json!({
        "patient_name": "Ravi Kumar",
        "blood_group": "O-",
        "urgency": "urgent",
        "units_needed": 2,
        "contact": "+91-9999999999",
        "location": {
            "coordinates": [77.5946, 12.9716],
            "address": "City Hospital, Bengaluru"
        }
    })
}

#[tokio::test]
async fn test_create_requires_authentication() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/blood-requests", Some(create_payload()), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_rejects_non_positive_units() {
    let app = TestApp::new();
    let token = app.mint_token(Uuid::new_v4(), "alice");

    let mut payload = create_payload();
    payload["units_needed"] = serde_json::json!(0);

    let response = app
        .request("POST", "/api/blood-requests", Some(payload), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("units_needed")
    );
}

#[tokio::test]
async fn test_create_rejects_malformed_coordinates() {
    let app = TestApp::new();
    let token = app.mint_token(Uuid::new_v4(), "alice");

    let mut payload = create_payload();
    payload["location"]["coordinates"] = serde_json::json!([77.5946]);

    let response = app
        .request("POST", "/api/blood-requests", Some(payload), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_empty_address() {
    let app = TestApp::new();
    let token = app.mint_token(Uuid::new_v4(), "alice");

    let mut payload = create_payload();
    payload["location"]["address"] = serde_json::json!("");

    let response = app
        .request("POST", "/api/blood-requests", Some(payload), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_created_request_is_open_with_empty_history() {
    let app = TestApp::with_database().await;
    let (_, token) = app.register_user("requester", "O-", false).await;

    let response = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(create_payload()),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let data = &response.body["data"];
    assert_eq!(data["status"], "open");
    assert_eq!(data["responses"], serde_json::json!([]));
    assert_eq!(data["fulfillments"], serde_json::json!([]));
    assert_eq!(data["requester"]["username"], "requester");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_full_lifecycle_respond_then_fulfill() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "O-", false).await;
    let (donor_id, donor_token) = app.register_user("donor_x", "O-", true).await;

    // Create: O-, 2 units.
    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(create_payload()),
            Some(&requester_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    // Donor X responds.
    let respond = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/respond"),
            Some(serde_json::json!({ "message": "On my way", "can_donate": true })),
            Some(&donor_token),
        )
        .await;
    assert_eq!(respond.status, StatusCode::OK, "{:?}", respond.body);

    // Requester records the fulfillment: 2 units from donor X.
    let fulfill = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/fulfill"),
            Some(serde_json::json!({ "donor_id": donor_id, "units_provided": 2 })),
            Some(&requester_token),
        )
        .await;
    assert_eq!(fulfill.status, StatusCode::OK, "{:?}", fulfill.body);
    assert_eq!(fulfill.body["data"]["request"]["status"], "fulfilled");
    assert_eq!(fulfill.body["data"]["total_units"], 2);

    // The detail view shows one fulfillment of 2 units.
    let detail = app
        .request(
            "GET",
            &format!("/api/blood-requests/{request_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    let fulfillments = detail.body["data"]["fulfillments"].as_array().unwrap();
    assert_eq!(fulfillments.len(), 1);
    assert_eq!(fulfillments[0]["units_provided"], 2);

    // Donor X's donation count incremented and First Drop was awarded.
    let me = app
        .request("GET", "/api/auth/me", None, Some(&donor_token))
        .await;
    assert_eq!(me.body["data"]["donation_count"], 1);
    assert_eq!(me.body["data"]["badges"], serde_json::json!(["First Drop"]));

    // The requester got a durable notification for the response.
    let unread = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&requester_token),
        )
        .await;
    assert!(unread.body["data"]["count"].as_i64().unwrap() >= 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_cannot_respond_to_own_request() {
    let app = TestApp::with_database().await;
    let (_, token) = app.register_user("requester", "B+", true).await;

    let mut payload = create_payload();
    payload["blood_group"] = serde_json::json!("B+");
    let created = app
        .request("POST", "/api/blood-requests", Some(payload), Some(&token))
        .await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let respond = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/respond"),
            Some(serde_json::json!({ "can_donate": true })),
            Some(&token),
        )
        .await;
    assert_eq!(respond.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_duplicate_response_is_conflict() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "A-", false).await;
    let (_, donor_token) = app.register_user("donor", "A-", true).await;

    let mut payload = create_payload();
    payload["blood_group"] = serde_json::json!("A-");
    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(payload),
            Some(&requester_token),
        )
        .await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let first = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/respond"),
            Some(serde_json::json!({ "can_donate": true })),
            Some(&donor_token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/respond"),
            Some(serde_json::json!({ "can_donate": true })),
            Some(&donor_token),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    // History unchanged: still exactly one response.
    let detail = app
        .request(
            "GET",
            &format!("/api/blood-requests/{request_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(detail.body["data"]["responses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_respond_to_cancelled_request_is_rejected() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "AB+", false).await;
    let (_, donor_token) = app.register_user("donor", "AB+", true).await;

    let mut payload = create_payload();
    payload["blood_group"] = serde_json::json!("AB+");
    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(payload),
            Some(&requester_token),
        )
        .await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let cancel = app
        .request(
            "PUT",
            &format!("/api/blood-requests/{request_id}/status"),
            Some(serde_json::json!({ "status": "cancelled" })),
            Some(&requester_token),
        )
        .await;
    assert_eq!(cancel.status, StatusCode::OK);

    let respond = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/respond"),
            Some(serde_json::json!({ "can_donate": true })),
            Some(&donor_token),
        )
        .await;
    assert_eq!(respond.status, StatusCode::BAD_REQUEST);
    assert_eq!(respond.body["error"], "INVALID_STATE");

    let detail = app
        .request(
            "GET",
            &format!("/api/blood-requests/{request_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(detail.body["data"]["responses"].as_array().unwrap().len(), 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_only_requester_or_admin_may_fulfill() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "O+", false).await;
    let (donor_id, donor_token) = app.register_user("donor", "O+", true).await;

    let mut payload = create_payload();
    payload["blood_group"] = serde_json::json!("O+");
    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(payload),
            Some(&requester_token),
        )
        .await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    // A random member cannot record fulfillments on someone else's request.
    let forbidden = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/fulfill"),
            Some(serde_json::json!({ "donor_id": donor_id, "units_provided": 1 })),
            Some(&donor_token),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_manual_complete_fulfills_regardless_of_units() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "B-", false).await;

    let mut payload = create_payload();
    payload["blood_group"] = serde_json::json!("B-");
    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(payload),
            Some(&requester_token),
        )
        .await;
    let request_id = created.body["data"]["id"].as_str().unwrap().to_string();

    let complete = app
        .request(
            "POST",
            &format!("/api/blood-requests/{request_id}/complete"),
            None,
            Some(&requester_token),
        )
        .await;
    assert_eq!(complete.status, StatusCode::OK);
    assert_eq!(complete.body["data"]["status"], "fulfilled");
}
