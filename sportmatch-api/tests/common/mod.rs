#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use sportmatch_api::config::{AppConfig, StorageBackend};
use sportmatch_api::store::MemoryStore;
use sportmatch_api::AppState;
use sportmatch_shared::middleware::detached_metrics;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "sprint4life";

#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

#[derive(Clone)]
pub struct Account {
    pub id: Uuid,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig {
            storage: StorageBackend::Memory,
            jwt_secret: TEST_SECRET.to_string(),
            ..AppConfig::default()
        };
        let state = AppState::new(Arc::new(MemoryStore::new()), config, detached_metrics());
        Self {
            router: sportmatch_api::router(state),
        }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Registers `username` and logs them in.
    pub async fn account(&self, username: &str) -> Account {
        let (status, body) = self
            .post(
                "/register",
                None,
                json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                    "sports": ["tennis"],
                    "age": 29
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        let id = Uuid::parse_str(body["data"]["id"].as_str().unwrap()).unwrap();

        let (status, body) = self
            .post(
                "/login",
                None,
                json!({ "email": format!("{username}@example.com"), "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        Account { id, token }
    }

    /// Likes in both directions and returns the match id.
    pub async fn matched(&self, a: &Account, b: &Account) -> Uuid {
        self.post("/likes", Some(&a.token), json!({ "to_user": b.id })).await;
        let (status, body) = self.post("/likes", Some(&b.token), json!({ "to_user": a.id })).await;
        assert_eq!(status, StatusCode::OK);
        Uuid::parse_str(body["data"]["match_id"].as_str().unwrap()).unwrap()
    }
}
