//! Integration tests for the HTTP surface.
//!
//! All tests here require a live PostgreSQL instance (`DATABASE_URL`);
//! run with `cargo test -- --ignored` against a scratch database.

mod helpers;

use http::StatusCode;
use serde_json::json;

use helpers::{TestApp, multipart_body};
use opsdash_entity::user::Role;

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_list_files_unauthenticated() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/files", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_otp_login_flow() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    app.create_user(
        "Login Senior",
        "login@example.com",
        Role::Senior,
        "GGM (Production)",
        dept,
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/auth/check-email",
            Some(json!({ "email": "login@example.com", "role": "senior" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/auth/check-password",
            Some(json!({ "email": "login@example.com", "password": "password123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/auth/send-otp",
            Some(json!({ "email": "login@example.com", "role": "senior" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let otp = response.body["otp"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/verify-otp",
            Some(json!({ "email": "login@example.com", "otp": otp })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["token"].as_str().unwrap().to_string();

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["files"].is_array());
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_wrong_password_rejected() {
    let app = TestApp::new().await;
    let dept = app.department_id("Sales").await;
    app.create_user(
        "Sales Senior",
        "sales@example.com",
        Role::Senior,
        "ED (Marketing)",
        dept,
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/auth/check-password",
            Some(json!({ "email": "sales@example.com", "password": "nope" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_upload_and_list() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let user = app
        .create_user("HR Senior", "hr@example.com", Role::Senior, "GGM (H&A)", dept)
        .await;
    let token = app.token_for(user).await;

    let body = multipart_body("headcount.csv", b"name,count\nops,12\n", None);
    let response = app
        .request_multipart("POST", "/api/files/upload", body, &token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let file_id = response.body["file_id"].as_str().unwrap().to_string();

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    let files = response.body["files"].as_array().unwrap();
    let entry = files
        .iter()
        .find(|f| f["id"].as_str() == Some(file_id.as_str()))
        .expect("uploaded file listed");
    assert_eq!(entry["display_name"], "headcount.csv");
    assert_eq!(entry["has_pending_edit"], false);

    let response = app
        .request(
            "GET",
            &format!("/api/files/{file_id}/content"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, b"name,count\nops,12\n");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_junior_cannot_list_files() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let junior = app
        .create_user(
            "HR Junior",
            "junior@example.com",
            Role::Junior,
            "Officer (HR)",
            dept,
        )
        .await;
    let token = app.token_for(junior).await;

    let response = app.request("GET", "/api/files", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_invalid_file_action_is_bad_request() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let director = app
        .create_user(
            "Prod Director",
            "dir@example.com",
            Role::Senior,
            "Director (Production)",
            dept,
        )
        .await;
    let token = app.token_for(director).await;

    let response = app
        .request(
            "POST",
            &format!("/api/files/{}/action", uuid::Uuid::new_v4()),
            Some(json!({ "action": "promote" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_delete_with_pending_edit_reports_reason() {
    let app = TestApp::new().await;
    let dept = app.department_id("Sales").await;
    let user = app
        .create_user(
            "Sales Senior",
            "sales@example.com",
            Role::Senior,
            "GGM (Marketing)",
            dept,
        )
        .await;
    let token = app.token_for(user).await;

    let body = multipart_body("targets.csv", b"v1\n", None);
    let response = app
        .request_multipart("POST", "/api/files/upload", body, &token)
        .await;
    let file_id = response.body["file_id"].as_str().unwrap().to_string();

    let body = multipart_body("targets.csv", b"v2\n", None);
    let response = app
        .request_multipart("PUT", &format!("/api/files/{file_id}"), body, &token)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/{file_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["reason"], "HAS_PENDING_EDIT");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_dashboard_access_toggle() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let senior = app
        .create_user("HR Senior", "hr@example.com", Role::Senior, "GGM (H&A)", dept)
        .await;
    let junior = app
        .create_user(
            "HR Junior",
            "junior@example.com",
            Role::Junior,
            "Officer (HR)",
            dept,
        )
        .await;
    let token = app.token_for(senior).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{junior}/dashboard-access"),
            Some(json!({ "enabled": false })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // Toggling a senior is a 404: the flag only exists on juniors.
    let response = app
        .request(
            "PUT",
            &format!("/api/users/{senior}/dashboard-access"),
            Some(json!({ "enabled": false })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
