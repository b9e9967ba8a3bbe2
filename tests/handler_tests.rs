mod common;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::*;
use storefront_api::{
    ApiError,
    auth::AuthUser,
    handlers,
    models::{ProductInput, RoleInput},
    validation::ValidatedJson,
};
use tokio::test;

// Handlers are called directly with hand-built extractors; routing and middleware
// are covered in the api and auth suites.

fn admin() -> AuthUser {
    AuthUser {
        id: "60c72b2f9b1e8a001f8e4caa".to_string(),
        roles: vec!["admin".to_string()],
    }
}

fn input() -> ProductInput {
    serde_json::from_value(headphones()).unwrap()
}

#[test]
async fn create_product_returns_201_with_body() {
    let state = memory_state(test_config());

    let (status, product) = handlers::create_product(admin(), State(state.clone()), ValidatedJson(input()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product.0.name, "Headphones");
    assert_eq!(product.0.image_url, "http://x/y.jpg");

    let listed = handlers::list_products(State(state)).await.unwrap();
    assert_eq!(listed.0, vec![product.0]);
}

#[test]
async fn get_product_distinguishes_malformed_and_unknown() {
    let state = memory_state(test_config());

    let err = handlers::get_product(State(state.clone()), Path("nope".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let err = handlers::get_product(State(state), Path("62f7a9b3c4d1e01234567890".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[test]
async fn update_product_returns_replacement() {
    let state = memory_state(test_config());
    let (_, created) = handlers::create_product(admin(), State(state.clone()), ValidatedJson(input()))
        .await
        .unwrap();

    let mut changed = input();
    changed.price = 49.0;
    let updated = handlers::update_product(
        admin(),
        State(state),
        Path(created.0.id.to_string()),
        ValidatedJson(changed),
    )
    .await
    .unwrap();
    assert_eq!(updated.0.id, created.0.id);
    assert_eq!(updated.0.price, 49.0);
}

#[test]
async fn delete_product_returns_204() {
    let state = memory_state(test_config());
    let (_, created) = handlers::create_product(admin(), State(state.clone()), ValidatedJson(input()))
        .await
        .unwrap();

    let status = handlers::delete_product(admin(), State(state.clone()), Path(created.0.id.to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = handlers::delete_product(admin(), State(state), Path(created.0.id.to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
async fn role_handlers_round_trip() {
    let state = memory_state(test_config());

    let (status, role) = handlers::create_role(
        State(state.clone()),
        ValidatedJson(RoleInput { name: "admin".into() }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);

    let fetched = handlers::get_role(State(state.clone()), Path(role.0.id.to_string()))
        .await
        .unwrap();
    assert_eq!(fetched.0, role.0);

    let err = handlers::create_role(
        State(state.clone()),
        ValidatedJson(RoleInput { name: "admin".into() }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    let renamed = handlers::update_role(
        State(state.clone()),
        Path(role.0.id.to_string()),
        ValidatedJson(RoleInput { name: "root".into() }),
    )
    .await
    .unwrap();
    assert_eq!(renamed.0.name, "root");

    let status = handlers::delete_role(State(state.clone()), Path(role.0.id.to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let listed = handlers::list_roles(State(state)).await.unwrap();
    assert!(listed.0.is_empty());
}
