use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use myflix_api::store::memory::MemoryStore;
use myflix_api::{app, AppState};

static INIT: Once = Once::new();

/// Router over a fresh in-memory store, seeded with the movie catalog only.
pub fn test_app() -> Router {
    INIT.call_once(|| {
        // Minimum bcrypt cost keeps registration-heavy tests fast. The config
        // singleton reads the environment once, before any hashing happens.
        std::env::set_var("BCRYPT_COST", "4");
    });
    app(AppState { store: Arc::new(MemoryStore::new()) })
}

/// Drives one request through the router and decodes the response. Non-JSON
/// bodies (welcome text, delete confirmations, static files) come back as a
/// JSON string value.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
    };
    (status, value)
}

pub async fn register(app: &Router, username: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "Username": username,
            "Password": "password123",
            "Email": format!("{username}@example.com"),
            "Birthday": "1990-05-01",
        })),
    )
    .await
}

pub async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "Username": username, "Password": password })),
    )
    .await
}

/// Registers `username` and logs in, returning a valid bearer token.
pub async fn auth_token(app: &Router, username: &str) -> String {
    let (status, _) = register(app, username).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = login(app, username, "password123").await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("login returns a token").to_string()
}
