//! Registration, login and profile endpoints.

mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

use common::{TestApp, PASSWORD};

#[tokio::test]
async fn register_returns_the_owner_view_without_password() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/register",
            None,
            json!({
                "username": "court_queen",
                "email": "Queen@Example.com",
                "password": PASSWORD,
                "full_name": "Serena",
                "sports": ["Tennis", "tennis", "padel"],
                "age": 31,
                "location": "Lyon"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "queen@example.com");
    assert_eq!(body["data"]["sports"], json!(["tennis", "padel"]));
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[rstest]
#[case(json!({ "username": "runner2", "email": "Runner@example.com", "password": PASSWORD }), "E1002")]
#[case(json!({ "username": "runner", "email": "other@example.com", "password": PASSWORD }), "E1003")]
#[tokio::test]
async fn duplicate_unique_fields_are_validation_errors(#[case] payload: serde_json::Value, #[case] code: &str) {
    let app = TestApp::new();
    app.account("runner").await;

    let (status, body) = app.post("/register", None, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], code);
}

#[rstest]
#[case(json!({ "username": "no_password", "email": "np@example.com" }), "password")]
#[case(json!({ "email": "nu@example.com", "password": PASSWORD }), "username")]
#[case(json!({ "username": "no_email", "password": PASSWORD }), "email")]
#[tokio::test]
async fn malformed_registration_bodies_use_the_error_envelope(
    #[case] payload: serde_json::Value,
    #[case] field: &str,
) {
    let app = TestApp::new();
    let (status, body) = app.post("/register", None, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "E0002");
    assert!(body["error"]["message"].as_str().unwrap().contains(field));
}

#[rstest]
#[case(json!({ "username": "ok_name", "email": "not-an-email", "password": PASSWORD }), "E0002")]
#[case(json!({ "username": "ok_name", "email": "a@example.com", "password": PASSWORD, "age": 16 }), "E0002")]
#[case(json!({ "username": "ok_name", "email": "a@example.com", "password": "short" }), "E1006")]
#[case(json!({ "username": "x", "email": "a@example.com", "password": PASSWORD }), "E2002")]
#[tokio::test]
async fn invalid_registrations_are_bad_requests(#[case] payload: serde_json::Value, #[case] code: &str) {
    let app = TestApp::new();
    let (status, body) = app.post("/register", None, payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], code);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.account("swimmer").await;

    let (status, body) = app
        .post("/login", None, json!({ "email": "swimmer@example.com", "password": "wrongpass1" }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "E1001");
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new();
    let swimmer = app.account("swimmer").await;

    let (status, _) = app.get("/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "E1005");

    let (status, body) = app.get("/me", Some(&swimmer.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], swimmer.id.to_string());
    assert_eq!(body["data"]["email"], "swimmer@example.com");
}

#[tokio::test]
async fn profiles_are_public_but_only_owners_edit_them() {
    let app = TestApp::new();
    let ana = app.account("ana").await;
    let ben = app.account("ben").await;

    let (status, body) = app.get(&format!("/profiles/{}", ana.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "ana");
    assert!(body["data"].get("email").is_none());

    let edit = json!({ "description": "trail runner", "sports": ["Trail"] });
    let (status, body) = app
        .send(Method::PUT, &format!("/profiles/{}", ana.id), Some(&ben.token), Some(edit.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E2003");

    let (status, body) = app
        .send(Method::PUT, &format!("/profiles/{}", ana.id), Some(&ana.token), Some(edit))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "trail runner");
    assert_eq!(body["data"]["sports"], json!(["trail"]));
}

#[tokio::test]
async fn profile_listing_is_paginated() {
    let app = TestApp::new();
    for name in ["ana", "ben", "cat"] {
        app.account(name).await;
    }

    let (status, body) = app.get("/profiles?page=1&per_page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pages_far_past_the_end_are_empty() {
    let app = TestApp::new();
    app.account("ana").await;

    let (status, body) = app.get(&format!("/profiles?page={}&per_page=100", u64::MAX), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"], json!([]));

    let (status, body) = app.get("/profiles?page=1000000000000000000&per_page=100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
}

#[tokio::test]
async fn unparseable_query_and_path_values_are_validation_errors() {
    let app = TestApp::new();

    let (status, body) = app.get("/profiles?page=first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E0002");

    let (status, body) = app.get("/profiles/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "E0002");
}

#[tokio::test]
async fn deleting_a_profile_removes_it() {
    let app = TestApp::new();
    let ana = app.account("ana").await;
    let uri = format!("/profiles/{}", ana.id);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&ana.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "E2001");
}

#[tokio::test]
async fn health_reports_the_store() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"][0]["name"], "memory");
}
