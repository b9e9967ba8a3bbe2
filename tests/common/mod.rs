#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use storefront_api::{
    AppConfig, AppState, MemoryRepository, create_router,
    auth::{Claims, encode_token},
    models::{Product, Role},
    repository::{ProductRepositoryState, RoleRepositoryState},
};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-value";

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    }
}

/// State over fresh in-memory collections.
pub fn memory_state(config: AppConfig) -> AppState {
    let products: ProductRepositoryState = Arc::new(MemoryRepository::<Product>::new());
    let roles: RoleRepositoryState = Arc::new(MemoryRepository::<Role>::new());
    AppState::new(config, products, roles)
}

pub fn test_app() -> Router {
    create_router(memory_state(test_config()))
}

pub fn token_with_roles(roles: &[&str]) -> String {
    let claims = Claims::new(
        "60c72b2f9b1e8a001f8e4caa",
        roles.iter().map(|r| r.to_string()).collect(),
        3600,
    );
    encode_token(&claims, TEST_JWT_SECRET).unwrap()
}

pub fn admin_token() -> String {
    token_with_roles(&["admin"])
}

pub fn customer_token() -> String {
    token_with_roles(&["customer"])
}

pub fn headphones() -> Value {
    serde_json::json!({
        "name": "Headphones",
        "description": "BT",
        "price": 59.99,
        "stock": 150,
        "category": "Electronic",
        "imageUrl": "http://x/y.jpg"
    })
}

/// Builds a request, optionally with a bearer token and a JSON body.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Drives one request through the router and returns status plus JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

/// Creates a product through the API as admin and returns its id.
pub async fn create_product(app: &Router, body: Value) -> String {
    let (status, created) = send(
        app,
        request(Method::POST, "/api/v1/products", Some(&admin_token()), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {created}");
    created["id"].as_str().unwrap().to_string()
}
