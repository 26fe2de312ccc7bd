use super::*;

use axum::Json;
use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use serde_json::{Value, json};

// =========================================================================
// parse_detail
// =========================================================================

#[test]
fn parse_detail_string() {
    assert_eq!(parse_detail(r#"{"detail":"Email already registered"}"#).as_deref(), Some("Email already registered"));
}

#[test]
fn parse_detail_validation_list() {
    let body = json!({
        "detail": [
            { "loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error" },
            { "loc": ["body", "password"], "msg": "field required", "type": "missing" }
        ]
    })
    .to_string();
    assert_eq!(
        parse_detail(&body).as_deref(),
        Some("value is not a valid email address; field required")
    );
}

#[test]
fn parse_detail_blank_string_is_none() {
    assert_eq!(parse_detail(r#"{"detail":"   "}"#), None);
}

#[test]
fn parse_detail_non_json_is_none() {
    assert_eq!(parse_detail("<html>502 Bad Gateway</html>"), None);
}

#[test]
fn parse_detail_missing_field_is_none() {
    assert_eq!(parse_detail(r#"{"message":"nope"}"#), None);
}

#[test]
fn parse_json_invalid_is_parse_error() {
    let err = parse_json::<User>("not json").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

// =========================================================================
// Against a local axum server
// =========================================================================

fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": "Ada",
        "is_active": true,
        "organization_ids": [1],
        "role": "member",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn mock_backend() -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "a@b.com" && body["password"] == "pw" {
                    (
                        axum::http::StatusCode::OK,
                        Json(json!({
                            "access_token": "T1",
                            "token_type": "bearer",
                            "expires_in": 3600,
                            "user": user_json(1, "a@b.com")
                        })),
                    )
                } else {
                    (axum::http::StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid email or password" })))
                }
            }),
        )
        .route(
            "/auth/signup",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "taken@b.com" {
                    return (
                        axum::http::StatusCode::BAD_REQUEST,
                        Json(json!({ "detail": "Email already registered" })),
                    );
                }
                if body["email"] == "ok200@b.com" {
                    return (
                        axum::http::StatusCode::OK,
                        Json(json!({ "access_token": "T9", "user": user_json(9, "ok200@b.com") })),
                    );
                }
                (
                    axum::http::StatusCode::CREATED,
                    Json(json!({ "access_token": "T3", "user": user_json(3, "new@b.com") })),
                )
            }),
        )
        .route(
            "/auth/profile",
            get(|headers: HeaderMap| async move {
                let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
                if auth == "Bearer T2" {
                    (axum::http::StatusCode::OK, Json(user_json(2, "b@b.com")))
                } else {
                    (
                        axum::http::StatusCode::UNAUTHORIZED,
                        Json(json!({ "detail": "Could not validate credentials" })),
                    )
                }
            }),
        )
        .route(
            "/auth/logout",
            post(|headers: HeaderMap| async move {
                if headers.contains_key("authorization") {
                    axum::http::StatusCode::NO_CONTENT
                } else {
                    axum::http::StatusCode::UNAUTHORIZED
                }
            }),
        )
}

async fn client() -> HttpAuthApi {
    let base = spawn_server(mock_backend()).await;
    HttpAuthApi::new(format!("{base}/"), Timeouts::default()).unwrap()
}

#[tokio::test]
async fn base_url_trailing_slash_trimmed() {
    let api = HttpAuthApi::new("http://localhost:8000/", Timeouts::default()).unwrap();
    assert_eq!(api.base_url(), "http://localhost:8000");
}

#[tokio::test]
async fn login_ok_returns_token_and_user() {
    let api = client().await;
    let resp = api.login(&LoginRequest { email: "a@b.com".into(), password: "pw".into() }).await.unwrap();
    assert_eq!(resp.access_token, "T1");
    assert_eq!(resp.expires_in, 3600);
    assert_eq!(resp.user.id, 1);
}

#[tokio::test]
async fn login_bad_password_carries_detail() {
    let api = client().await;
    let err = api.login(&LoginRequest { email: "a@b.com".into(), password: "nope".into() }).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.detail(), Some("Invalid email or password"));
}

#[tokio::test]
async fn signup_created_returns_token() {
    let api = client().await;
    let req = SignupRequest { email: "new@b.com".into(), password: "pw".into(), name: "New".into() };
    let resp = api.signup(&req).await.unwrap();
    assert_eq!(resp.access_token, "T3");
}

#[tokio::test]
async fn signup_duplicate_email_surfaces_detail() {
    let api = client().await;
    let req = SignupRequest { email: "taken@b.com".into(), password: "pw".into(), name: "Dup".into() };
    let err = api.signup(&req).await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 400, detail: Some("Email already registered".into()) });
}

#[tokio::test]
async fn signup_requires_created_status() {
    let api = client().await;
    let req = SignupRequest { email: "ok200@b.com".into(), password: "pw".into(), name: "Odd".into() };
    let err = api.signup(&req).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 200, detail: None }));
}

#[tokio::test]
async fn profile_sends_bearer_token() {
    let api = client().await;
    let user = api.profile("T2").await.unwrap();
    assert_eq!(user.email, "b@b.com");
}

#[tokio::test]
async fn profile_stale_token_is_unauthorized() {
    let api = client().await;
    let err = api.profile("stale").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn logout_accepts_no_content() {
    let api = client().await;
    api.logout("T1").await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpAuthApi::new(format!("http://{addr}"), Timeouts { request_secs: 2, connect_secs: 1 }).unwrap();
    let err = api.login(&LoginRequest { email: "a@b.com".into(), password: "pw".into() }).await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}
