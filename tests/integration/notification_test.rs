//! Notification endpoint tests.

use http::StatusCode;

use super::helpers::TestApp;

#[tokio::test]
async fn test_notifications_require_authentication() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/notifications", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_nearby_donor_gets_durable_notification_on_creation() {
    let app = TestApp::with_database().await;
    let (_, requester_token) = app.register_user("requester", "O-", false).await;
    // Donor registered at the same coordinates the request will use.
    let (_, donor_token) = app.register_user("donor_near", "O-", true).await;

    let created = app
        .request(
            "POST",
            "/api/blood-requests",
            Some(serde_json::json!({
                "patient_name": "Ravi Kumar",
                "blood_group": "O-",
                "urgency": "critical",
                "units_needed": 1,
                "contact": "+91-9999999999",
                "location": {
                    "coordinates": [77.5946, 12.9716],
                    "address": "City Hospital, Bengaluru"
                }
            })),
            Some(&requester_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    // The matched donor has a persisted notification even though no
    // socket was connected.
    let unread = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&donor_token),
        )
        .await;
    assert_eq!(unread.body["data"]["count"], 1);

    let list = app
        .request("GET", "/api/notifications", None, Some(&donor_token))
        .await;
    let items = list.body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["event"], "nearby_request");

    // Mark all read; the unread count drops to zero.
    let marked = app
        .request(
            "PUT",
            "/api/notifications/read-all",
            None,
            Some(&donor_token),
        )
        .await;
    assert_eq!(marked.body["data"]["marked"], 1);

    let unread = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&donor_token),
        )
        .await;
    assert_eq!(unread.body["data"]["count"], 0);
}
