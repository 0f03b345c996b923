//! Integration test harness.

mod integration {
    pub mod helpers;

    mod auth_test;
    mod blood_request_test;
    mod health_test;
    mod notification_test;
}
