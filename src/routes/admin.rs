use crate::{
    AppState,
    auth::{RequiredRole, authenticate, require_role},
    handlers,
};
use axum::{
    Router, middleware,
    routing::{post, put},
};

/// Admin Router Module
///
/// Catalogue writes (and role writes when `protect_role_routes` is set).
///
/// Access Control:
/// Every route here runs `authenticate` (401 on a missing or invalid token) and then
/// `require_role` with the admin role (403 when the verified identity lacks it).
/// Route layers wrap outside-in in reverse order of declaration, so `authenticate`
/// is declared last to run first.
///
/// The layers also wrap the method fallback of these paths, so an unsupported method
/// on `/products/{id}` answers 401/403 before it can answer 405.
pub fn admin_routes(state: &AppState) -> Router<AppState> {
    let mut router = Router::new()
        // POST /products
        .route("/products", post(handlers::create_product))
        // PUT/DELETE /products/{id}
        .route(
            "/products/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        );

    if state.config.protect_role_routes {
        router = router
            .route("/roles", post(handlers::create_role))
            .route(
                "/roles/{id}",
                put(handlers::update_role).delete(handlers::delete_role),
            );
    }

    router
        .route_layer(middleware::from_fn_with_state(
            RequiredRole::admin(),
            require_role,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}
