//! Shared fixture for HTTP integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use signup_api::api::{create_router, AppState};
use signup_api::config::Config;
use signup_api::infra::{Database, UserRepository, UserStore};
use signup_api::services::UserManager;

pub const API_1_0_USERS: &str = "/api/1.0/users";

/// Router plus a direct handle on the store it writes to.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<dyn UserRepository>,
}

impl TestApp {
    /// Build the app on a private in-memory database and reset it.
    pub async fn spawn() -> Self {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            // Every pooled connection to sqlite::memory: is a separate database
            database_max_connections: 1,
            ..Config::default()
        };
        let database = Arc::new(
            Database::connect(&config)
                .await
                .expect("in-memory database should start"),
        );

        let users: Arc<dyn UserRepository> = Arc::new(UserStore::new(database.get_connection()));
        let user_service = Arc::new(UserManager::new(users.clone()));
        let router = create_router(AppState::new(user_service, database));

        let app = Self { router, users };
        app.reset().await;
        app
    }

    /// Remove every stored user.
    pub async fn reset(&self) {
        self.users
            .delete_all()
            .await
            .expect("deleting all users should succeed");
    }

    pub async fn user_count(&self) -> u64 {
        self.users.count().await.expect("count should succeed")
    }

    /// POST a JSON payload to the signup route.
    pub async fn post_signup(&self, payload: &Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(API_1_0_USERS)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request should build"),
        )
        .await
    }

    /// POST an arbitrary body to the signup route.
    pub async fn post_raw(&self, content_type: &str, body: &'static str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(API_1_0_USERS)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .expect("request should build"),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should answer");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }
}

/// Payload that passes every rule.
pub fn valid_user() -> Value {
    serde_json::json!({
        "username": "test-user",
        "displayName": "test-display",
        "password": "P4ssword",
    })
}

/// `valid_user()` with one field replaced.
pub fn valid_user_with(field: &str, value: Value) -> Value {
    let mut user = valid_user();
    user[field] = value;
    user
}
