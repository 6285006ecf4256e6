#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use gatepass_api::auth::jwt::{generate_access_token, JwtConfig};
use gatepass_api::auth::password::hash_password;
use gatepass_api::config::ServerConfig;
use gatepass_api::context::DataContext;
use gatepass_api::router::build_app_router;
use gatepass_api::state::AppState;
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_db::models::society::{CreateSociety, Society};
use gatepass_db::models::user::{CreateUser, User, UserRole};
use gatepass_db::repositories::{SocietyRepo, UserRepo};
use gatepass_db::{StorageConfig, StorageProvider};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Password of every seeded account.
pub const TEST_PASSWORD: &str = "gate-pass-123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        storage: StorageConfig::Local {
            dir: "./data".into(),
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over `store`, with the cache loaded.
pub async fn build_test_app(store: Arc<dyn StorageProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        context: Arc::new(DataContext::load(store).await),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Seed a society whose permission window is open (`active`) or lapsed.
pub async fn seed_society(store: &dyn StorageProvider, name: &str, active: bool) -> Society {
    let now = Utc::now();
    let (from, to) = if active {
        (now - Duration::days(30), now + Duration::days(335))
    } else {
        (now - Duration::days(400), now - Duration::days(35))
    };
    SocietyRepo::create(
        store,
        &CreateSociety {
            name: name.to_string(),
            address: None,
            permission_from_date: from,
            permission_to_date: to,
        },
    )
    .await
    .expect("society seeding should succeed")
}

/// A membership; residents get a block and flat.
pub fn member(role: RoleKind, society_id: Option<&str>, status: RoleStatus) -> UserRole {
    let resident = role == RoleKind::Resident;
    UserRole {
        role,
        society_id: society_id.map(str::to_string),
        status,
        block: resident.then(|| "A".to_string()),
        flat_number: resident.then(|| "101".to_string()),
    }
}

/// Seed a user with password [`TEST_PASSWORD`].
pub async fn seed_user(store: &dyn StorageProvider, login: &str, roles: Vec<UserRole>) -> User {
    UserRepo::create(
        store,
        &CreateUser {
            name: login.to_string(),
            email: format!("{login}@example.com"),
            login_name: login.to_string(),
            password_hash: Some(hash_password(TEST_PASSWORD).expect("hashing should succeed")),
            roles,
            is_resigned: false,
        },
    )
    .await
    .expect("user seeding should succeed")
}

/// Access token for a seeded membership, signed with the test secret.
pub fn token_for(user: &User, role: RoleKind, society_id: Option<&str>) -> String {
    generate_access_token(&user.id, role, society_id, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
