use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Public Router Module
///
/// Endpoints reachable without a token. Product writes are registered on the same
/// paths by the admin router; Axum merges the two method sets per path, so e.g.
/// `GET /products/{id}` stays public while `DELETE /products/{id}` is guarded.
pub fn public_routes(protect_role_routes: bool) -> Router<AppState> {
    let router = Router::new()
        // GET /products
        .route("/products", get(handlers::list_products))
        // GET /products/{id}
        // 400 for a malformed id, 404 for an unknown one.
        .route("/products/{id}", get(handlers::get_product))
        // GET /roles, GET /roles/{id}
        .route("/roles", get(handlers::list_roles))
        .route("/roles/{id}", get(handlers::get_role));

    if protect_role_routes {
        return router;
    }

    // Role management is open by default; PROTECT_ROLE_ROUTES moves these three
    // routes into the admin router instead.
    router
        .route("/roles", post(handlers::create_role))
        .route(
            "/roles/{id}",
            put(handlers::update_role).delete(handlers::delete_role),
        )
}
