use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorBody},
    models::{Product, ProductInput, Role, RoleInput},
    validation::ValidatedJson,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// Handlers only select status codes. Every rule lives in the services, and every
// failure travels back as `ApiError`.

// --- Products ---

/// list_products
///
/// [Public Route] Every product in the store, in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses((status = 200, description = "All products", body = [Product]))
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list().await?))
}

/// get_product
///
/// [Public Route] A single product by id.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.products.get(&id).await?))
}

/// create_product
///
/// [Admin Route] Creates a product. Runs behind `authenticate` and `require_role(admin)`.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 401, description = "No token provided, authorization denied", body = ErrorBody),
        (status = 403, description = "Admin privileges required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    tracing::debug!(actor = %user.id, "create product");
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// update_product
///
/// [Admin Route] Replaces every field of an existing product.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid body or malformed id", body = ErrorBody),
        (status = 401, description = "No token provided, authorization denied", body = ErrorBody),
        (status = 403, description = "Admin privileges required", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    tracing::debug!(actor = %user.id, %id, "update product");
    Ok(Json(state.products.update(&id, input).await?))
}

/// delete_product
///
/// [Admin Route] Removes a product; 204 on success.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ID (24 hex characters)")),
    responses(
        (status = 204, description = "No content"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "No token provided, authorization denied", body = ErrorBody),
        (status = 403, description = "Admin privileges required", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!(actor = %user.id, %id, "delete product");
    state.products.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Roles ---
// Role mutations are public unless PROTECT_ROLE_ROUTES is set, so these handlers
// never require an `AuthUser`.

/// list_roles
///
/// [Public Route] Every role, in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "Roles",
    responses((status = 200, description = "A list of roles", body = [Role]))
)]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.roles.list().await?))
}

/// get_role
#[utoipa::path(
    get,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID (24 hex characters)")),
    responses(
        (status = 200, description = "A single role", body = Role),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Role not found", body = ErrorBody)
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.roles.get(&id).await?))
}

/// create_role
///
/// Creates a role; the name must not already be taken.
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    tag = "Roles",
    request_body = RoleInput,
    responses(
        (status = 201, description = "The created role", body = Role),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 409, description = "Role with this name already exists", body = ErrorBody)
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    let role = state.roles.create(input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// update_role
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID (24 hex characters)")),
    request_body = RoleInput,
    responses(
        (status = 200, description = "The updated role", body = Role),
        (status = 400, description = "Invalid body or malformed id", body = ErrorBody),
        (status = 404, description = "Role not found", body = ErrorBody),
        (status = 409, description = "Role with this name already exists", body = ErrorBody)
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<RoleInput>,
) -> Result<Json<Role>, ApiError> {
    Ok(Json(state.roles.update(&id, input).await?))
}

/// delete_role
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    tag = "Roles",
    params(("id" = String, Path, description = "Role ID (24 hex characters)")),
    responses(
        (status = 204, description = "No content"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Role not found", body = ErrorBody)
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.roles.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
