use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    models::{Product, Role},
    repository::{
        MemoryRepository, PostgresRepository, ProductRepositoryState, RoleRepositoryState,
    },
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, picks the store, wires the layers and
/// serves HTTP.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (fail-fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup: RUST_LOG wins, otherwise local-friendly defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_api=debug,tower_http=info,axum=trace".into());

    // 3. Pretty logs locally, JSON in production.
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Store selection: Postgres when a DATABASE_URL is configured, in-memory otherwise.
    let (products, roles): (ProductRepositoryState, RoleRepositoryState) = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("FATAL: Failed to run database migrations.");

            tracing::info!("Using Postgres store");
            let repo = Arc::new(PostgresRepository::new(pool));
            (
                repo.clone() as ProductRepositoryState,
                repo as RoleRepositoryState,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            (
                Arc::new(MemoryRepository::<Product>::new()) as ProductRepositoryState,
                Arc::new(MemoryRepository::<Role>::new()) as RoleRepositoryState,
            )
        }
    };

    if config.protect_role_routes {
        tracing::info!("Role mutation routes require the admin role");
    }

    // 5. Manual dependency wiring: repositories → services → shared state.
    let port = config.port;
    let app = create_router(AppState::new(config, products, roles));

    // 6. Server startup.
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("FATAL: Failed to bind {addr}: {e}"));

    tracing::info!("Listening on {addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{port}/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
