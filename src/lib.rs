use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    response::{IntoResponse, Response},
    routing::get,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

// Access-level route groups (public, admin).
pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use auth::TokenVerifier;
pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{
    MemoryRepository, PostgresRepository, ProductRepositoryState, RoleRepositoryState,
};
pub use services::{ProductService, RoleService};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the OpenAPI
/// document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Storefront API", description = "Products and roles catalogue API"),
    paths(
        handlers::list_products, handlers::get_product, handlers::create_product,
        handlers::update_product, handlers::delete_product,
        handlers::list_roles, handlers::get_role, handlers::create_role,
        handlers::update_role, handlers::delete_role
    ),
    components(
        schemas(
            models::Product, models::ProductInput, models::Role, models::RoleInput,
            error::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Products", description = "Product catalogue"),
        (name = "Roles", description = "Role management")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by guarded operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// AppState
///
/// The single, cloneable container shared across all requests. Built once by
/// `AppState::new`, which is also where the repository → service wiring happens.
#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub roles: RoleService,
    /// Token verification material derived from `config.jwt_secret`.
    pub tokens: TokenVerifier,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the services on top of the given repositories. Any `Repository`
    /// implementation can be passed in (Postgres in deployments, in-memory in tests).
    pub fn new(
        config: AppConfig,
        product_repo: ProductRepositoryState,
        role_repo: RoleRepositoryState,
    ) -> Self {
        Self {
            products: ProductService::new(product_repo),
            roles: RoleService::new(role_repo),
            tokens: TokenVerifier::new(&config.jwt_secret),
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for TokenVerifier {
    fn from_ref(app_state: &AppState) -> TokenVerifier {
        app_state.tokens.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Public and admin groups share paths; merging combines their method routers.
    let api = Router::new()
        .merge(public::public_routes(state.config.protect_role_routes))
        .merge(admin::admin_routes(&state));

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "ok" }))
        .nest("/api/v1", api)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id))
                // Error boundary: a panicking handler becomes an opaque 500.
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .layer(cors)
}

fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the `x-request-id` set above, so every
/// log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
