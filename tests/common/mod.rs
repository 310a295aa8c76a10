// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use nutrition_tracker::config::Config;
use nutrition_tracker::db::{FirestoreDb, MemoryDb, UserStore};
use nutrition_tracker::middleware::auth::create_jwt;
use nutrition_tracker::models::User;
use nutrition_tracker::routes::create_router;
use nutrition_tracker::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over a fresh in-process user store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app served from `public_url` (e.g. an https origin).
#[allow(dead_code)]
pub fn create_test_app_with_public_url(public_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.public_url = public_url.to_string();
    create_test_app_with_config(config)
}

/// Create a test app from an arbitrary config and store.
#[allow(dead_code)]
pub fn create_test_app_with_store(
    config: Config,
    store: UserStore,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, store).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Create a test app with third-party clients pointed at `upstream_url`.
#[allow(dead_code)]
pub fn create_test_app_with_upstream(upstream_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut state = AppState::new(Config::test_default(), UserStore::Memory(MemoryDb::new()))
        .expect("Failed to build app state");
    state.nutritionix = state.nutritionix.with_base_url(upstream_url);
    state.spoonacular = state.spoonacular.with_base_url(upstream_url);
    let state = Arc::new(state);
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_store(config, UserStore::Memory(MemoryDb::new()))
}

/// Mint a session token with the test signing key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, email: &str) -> String {
    create_jwt(user_id, email, &Config::test_default().session_secret)
        .expect("Failed to create JWT")
}

/// A stored user with no profile fields set.
#[allow(dead_code)]
pub fn test_user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: None,
        weight: None,
        height: None,
        age: None,
        gender: None,
        activity_level: None,
        created_at: "2026-01-15T10:00:00.000Z".to_string(),
        updated_at: "2026-01-15T10:00:00.000Z".to_string(),
    }
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request carrying a Bearer token.
#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
