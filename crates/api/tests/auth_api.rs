//! HTTP-level integration tests for login, registration and RBAC.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, get, get_auth, member, post_json, post_json_auth, seed_society, seed_user,
    token_for, TEST_PASSWORD,
};
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_db::providers::MemoryStore;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn login_body(login: &str, password: &str) -> Value {
    json!({ "login": login, "password": password })
}

fn registration(login: &str, role: &str, society_id: &str) -> Value {
    json!({
        "name": "Asha Rao",
        "email": format!("{login}@example.com"),
        "loginName": login,
        "password": TEST_PASSWORD,
        "role": role,
        "societyId": society_id,
        "block": "B",
        "flatNumber": "204",
    })
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

/// The first superadmin can be created once; a second attempt conflicts.
#[tokio::test]
async fn bootstrap_creates_superadmin_once() {
    let app = common::build_test_app(Arc::new(MemoryStore::new())).await;
    let body = json!({
        "name": "Platform Owner",
        "email": "owner@example.com",
        "loginName": "owner",
        "password": TEST_PASSWORD,
    });

    let response = post_json(&app, "/api/v1/auth/bootstrap", body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["roles"][0]["role"], "superadmin");
    assert_eq!(json["data"]["roles"][0]["status"], "approved");
    assert!(json["data"].get("passwordHash").is_none());

    let again = post_json(&app, "/api/v1/auth/bootstrap", body).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(again).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login works with either the login name or the email address.
#[tokio::test]
async fn login_accepts_login_name_or_email() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let guard = seed_user(
        store.as_ref(),
        "gate1",
        vec![member(RoleKind::Security, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;

    for login in ["gate1", "gate1@example.com"] {
        let response =
            post_json(&app, "/api/v1/auth/login", login_body(login, TEST_PASSWORD)).await;
        assert_eq!(response.status(), StatusCode::OK, "login via {login}");
        let json = body_json(response).await;
        assert!(json["accessToken"].is_string());
        assert_eq!(json["expiresIn"], 3600);
        assert_eq!(json["role"], "security");
        assert_eq!(json["societyId"], society.id.as_str());
        assert_eq!(json["user"]["id"], guard.id.as_str());
    }
}

/// An incorrect password is rejected with 401.
#[tokio::test]
async fn login_wrong_password_returns_401() {
    let store = Arc::new(MemoryStore::new());
    seed_user(
        store.as_ref(),
        "owner",
        vec![member(RoleKind::Superadmin, None, RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;

    let body = login_body("owner", "not-the-password");
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

/// An unknown account gets the same 401 as a bad password.
#[tokio::test]
async fn login_unknown_user_returns_401() {
    let app = common::build_test_app(Arc::new(MemoryStore::new())).await;
    let response = post_json(&app, "/api/v1/auth/login", login_body("nobody", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A resigned account cannot sign in.
#[tokio::test]
async fn resigned_account_is_forbidden() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let user = seed_user(
        store.as_ref(),
        "former",
        vec![member(RoleKind::Resident, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    gatepass_db::repositories::UserRepo::update(
        store.as_ref(),
        &user.id,
        &gatepass_db::models::user::UpdateUser {
            is_resigned: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(store).await;

    let response = post_json(&app, "/api/v1/auth/login", login_body("former", TEST_PASSWORD)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Members of a society whose permission window has lapsed are turned away.
#[tokio::test]
async fn expired_society_blocks_login() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Old Town", false).await;
    seed_user(
        store.as_ref(),
        "resident1",
        vec![member(RoleKind::Resident, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;

    let body = login_body("resident1", TEST_PASSWORD);
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("expired"));
}

/// A token issued before the society lapsed no longer opens society routes.
#[tokio::test]
async fn expired_society_blocks_existing_token() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Old Town", false).await;
    let admin = seed_user(
        store.as_ref(),
        "admin1",
        vec![member(RoleKind::Administrator, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;
    let token = token_for(&admin, RoleKind::Administrator, Some(&society.id));

    let response = get_auth(&app, "/api/v1/society/residents", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Registration and approval
// ---------------------------------------------------------------------------

/// A fresh registration is pending and cannot sign in yet.
#[tokio::test]
async fn pending_registration_cannot_login() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let app = common::build_test_app(store).await;

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("asha", "resident", &society.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["roles"][0]["status"], "pending");
    assert_eq!(json["data"]["roles"][0]["flatNumber"], "204");

    let login = post_json(&app, "/api/v1/auth/login", login_body("asha", TEST_PASSWORD)).await;
    assert_eq!(login.status(), StatusCode::FORBIDDEN);
    let json = body_json(login).await;
    assert!(json["error"].as_str().unwrap().contains("awaiting approval"));
}

/// Registering twice with the same email conflicts.
#[tokio::test]
async fn duplicate_registration_conflicts() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let app = common::build_test_app(store).await;

    let body = registration("asha", "resident", &society.id);
    let first = post_json(&app, "/api/v1/auth/register", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Residents must give their block and flat.
#[tokio::test]
async fn resident_registration_requires_flat() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let app = common::build_test_app(store).await;

    let mut body = registration("asha", "resident", &society.id);
    body["flatNumber"] = Value::Null;
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

/// Nobody can self-register as superadmin.
#[tokio::test]
async fn superadmin_role_cannot_be_requested() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let app = common::build_test_app(store).await;

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        registration("sneaky", "superadmin", &society.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// The society administrator approves a resident, who can then sign in.
#[tokio::test]
async fn administrator_approves_resident() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let admin = seed_user(
        store.as_ref(),
        "admin1",
        vec![member(RoleKind::Administrator, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;
    let admin_token = token_for(&admin, RoleKind::Administrator, Some(&society.id));

    let registered = body_json(
        post_json(
            &app,
            "/api/v1/auth/register",
            registration("asha", "resident", &society.id),
        )
        .await,
    )
    .await;
    let user_id = registered["data"]["id"].as_str().unwrap().to_string();

    let pending = body_json(get_auth(&app, "/api/v1/society/pending", &admin_token).await).await;
    assert_eq!(pending["data"].as_array().unwrap().len(), 1);

    let decision = json!({ "role": "resident", "status": "approved" });
    let response = post_json_auth(
        &app,
        &format!("/api/v1/society/members/{user_id}/decision"),
        &admin_token,
        decision.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Deciding the same request again is a conflict.
    let again = post_json_auth(
        &app,
        &format!("/api/v1/society/members/{user_id}/decision"),
        &admin_token,
        decision,
    )
    .await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let login = post_json(&app, "/api/v1/auth/login", login_body("asha", TEST_PASSWORD)).await;
    assert_eq!(login.status(), StatusCode::OK);
    let json = body_json(login).await;
    assert_eq!(json["role"], "resident");
    assert_eq!(json["societyId"], society.id.as_str());
}

/// Administrator requests go to the superadmin.
#[tokio::test]
async fn superadmin_approves_administrator() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let owner = seed_user(
        store.as_ref(),
        "owner",
        vec![member(RoleKind::Superadmin, None, RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;
    let owner_token = token_for(&owner, RoleKind::Superadmin, None);

    let registered = body_json(
        post_json(
            &app,
            "/api/v1/auth/register",
            registration("boss", "administrator", &society.id),
        )
        .await,
    )
    .await;
    let user_id = registered["data"]["id"].as_str().unwrap().to_string();

    let pending = body_json(
        get_auth(&app, "/api/v1/admin/administrators/pending", &owner_token).await,
    )
    .await;
    assert_eq!(pending["data"][0]["id"], user_id.as_str());

    let response = post_json_auth(
        &app,
        &format!("/api/v1/admin/administrators/{user_id}/decision"),
        &owner_token,
        json!({ "role": "administrator", "societyId": society.id, "status": "approved" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let login = post_json(&app, "/api/v1/auth/login", login_body("boss", TEST_PASSWORD)).await;
    assert_eq!(body_json(login).await["role"], "administrator");
}

// ---------------------------------------------------------------------------
// Session and RBAC
// ---------------------------------------------------------------------------

/// `/auth/me` echoes the session carried by the token.
#[tokio::test]
async fn me_returns_session() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let guard = seed_user(
        store.as_ref(),
        "gate1",
        vec![member(RoleKind::Security, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;
    let token = token_for(&guard, RoleKind::Security, Some(&society.id));

    let json = body_json(get_auth(&app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(json["data"]["role"], "security");
    assert_eq!(json["data"]["user"]["loginName"], "gate1");
}

/// Requests without a bearer token are rejected with 401.
#[tokio::test]
async fn missing_token_returns_401() {
    let app = common::build_test_app(Arc::new(MemoryStore::new())).await;
    let response = get(&app, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A garbage token is rejected with 401.
#[tokio::test]
async fn invalid_token_returns_401() {
    let app = common::build_test_app(Arc::new(MemoryStore::new())).await;
    let response = get_auth(&app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A resident cannot use the gate endpoints.
#[tokio::test]
async fn wrong_role_returns_403() {
    let store = Arc::new(MemoryStore::new());
    let society = seed_society(store.as_ref(), "Lake View", true).await;
    let resident = seed_user(
        store.as_ref(),
        "resident1",
        vec![member(RoleKind::Resident, Some(&society.id), RoleStatus::Approved)],
    )
    .await;
    let app = common::build_test_app(store).await;
    let token = token_for(&resident, RoleKind::Resident, Some(&society.id));

    let response = get_auth(&app, "/api/v1/visitors", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}
