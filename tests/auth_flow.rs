//! End-to-end tests for the auth and customer surfaces.
//!
//! Drives the assembled router the way a client would: register, login,
//! then exercise the role-gated customer endpoints with bearer tokens.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use customer_backend::app::build_router;
use customer_backend::auth::{AuthService, AuthState, GateState, JwtHandler, UserStore};
use customer_backend::customers::{CustomerState, CustomerStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-key-0123456789";

// bcrypt::MIN_COST is a private constant; mirror its value (4) for fast test hashing.
const MIN_COST: u32 = 4;

struct TestApp {
    app: Router,
    user_store: Arc<UserStore>,
    _auth_db: NamedTempFile,
    _customer_db: NamedTempFile,
}

fn build_test_app_with_ttl(ttl_secs: i64) -> TestApp {
    let auth_db = NamedTempFile::new().unwrap();
    let customer_db = NamedTempFile::new().unwrap();

    let user_store = Arc::new(UserStore::new(auth_db.path().to_str().unwrap()).unwrap());
    let jwt_handler = Arc::new(JwtHandler::new(TEST_SECRET.to_string(), ttl_secs));
    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        jwt_handler.clone(),
        MIN_COST,
    ));
    let customer_store = Arc::new(CustomerStore::new(customer_db.path().to_str().unwrap()).unwrap());

    let app = build_router(
        AuthState::new(auth_service),
        GateState {
            user_store: user_store.clone(),
            jwt_handler,
        },
        CustomerState::new(customer_store),
    );

    TestApp {
        app,
        user_store,
        _auth_db: auth_db,
        _customer_db: customer_db,
    }
}

fn build_test_app() -> TestApp {
    build_test_app_with_ttl(3600)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn register(app: &Router, username: &str, password: &str, role: &str) -> (StatusCode, String) {
    send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": username, "password": password, "role": role })),
    )
    .await
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let value: Value = serde_json::from_str(&body).unwrap();
    value["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_then_login_returns_roles_and_token() {
    let test = build_test_app();

    let (status, body) = register(&test.app, "alice", "pw1", "ROLE_USER").await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["username"], "alice");
    assert_eq!(value["role"], "ROLE_USER");

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["username"], "alice");
    assert_eq!(value["roles"], json!(["ROLE_USER"]));
    assert!(!value["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn register_with_missing_field_is_bad_request() {
    let test = build_test_app();

    let (status, _) = send(
        &test.app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "alice", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The failed registration must not have created the identity.
    assert!(test.user_store.find_by_username("alice").unwrap().is_none());
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let test = build_test_app();
    register(&test.app, "alice", "pw1", "ROLE_USER").await;

    let (wrong_status, wrong_body) = send(
        &test.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &test.app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "mallory", "password": "pw1" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn customer_list_is_reachable_anonymously() {
    let test = build_test_app();

    let (status, body) = send(&test.app, Method::GET, "/api/v1/customer", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn protected_endpoints_require_a_context() {
    let test = build_test_app();

    // No header at all: the gate passes the request through and the
    // authorization check denies it.
    let (status, _) = send(&test.app, Method::GET, "/api/v1/customer/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A garbage token is treated exactly like no token.
    let (status, _) = send(
        &test.app,
        Method::GET,
        "/api/v1/customer/1",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // But the unrestricted list stays reachable with the same garbage token.
    let (status, _) = send(
        &test.app,
        Method::GET,
        "/api/v1/customer",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn customer_crud_with_user_role() {
    let test = build_test_app();
    register(&test.app, "alice", "pw1", "ROLE_USER").await;
    let token = login_token(&test.app, "alice", "pw1").await;

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/api/v1/customer",
        Some(&token),
        Some(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "phone": "+44 20 7946 0000",
            "email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    let created: Value = serde_json::from_str(&body).unwrap();
    let id = created["id"].as_i64().unwrap();

    let uri = format!("/api/v1/customer/{id}");
    let (status, body) = send(&test.app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched["firstname"], "Ada");

    let (status, body) = send(
        &test.app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "phone": "+1 555 0100",
            "email": "ada@example.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(updated["phone"], "+1 555 0100");

    let (status, _) = send(&test.app, Method::GET, "/api/v1/customer/9999", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_requires_admin_and_roles_are_lookup_time() {
    let test = build_test_app();
    register(&test.app, "bob", "pw2", "ROLE_USER").await;
    let token = login_token(&test.app, "bob", "pw2").await;

    let (_, body) = send(
        &test.app,
        Method::POST,
        "/api/v1/customer",
        Some(&token),
        Some(json!({
            "firstname": "Grace",
            "lastname": "Hopper",
            "phone": "+1 555 0101",
            "email": "grace@example.com"
        })),
    )
    .await;
    let id = serde_json::from_str::<Value>(&body).unwrap()["id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/v1/customer/{id}");

    // ROLE_USER alone cannot delete.
    let (status, _) = send(&test.app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Grant ROLE_ADMIN after the token was issued: the gate resolves roles
    // at lookup time, so the same still-valid token now passes.
    test.user_store.grant_role("bob", "ROLE_ADMIN").unwrap();
    let (status, body) = send(&test.app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "true");

    // Deleting the same record again is a 404.
    let (status, _) = send(&test.app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_ttl_token_is_rejected_at_the_gate() {
    let test = build_test_app_with_ttl(0);
    register(&test.app, "alice", "pw1", "ROLE_USER").await;
    let token = login_token(&test.app, "alice", "pw1").await;

    // The token was issued, but it is already at its expiry boundary, so
    // the gate establishes no context.
    let (status, _) = send(
        &test.app,
        Method::GET,
        "/api/v1/customer/1",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_check_is_public() {
    let test = build_test_app();
    let (status, _) = send(&test.app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
