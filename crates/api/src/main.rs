use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use formsmith_api::config::{LogFormat, ServerConfig, StoreBackend};
use formsmith_api::router::build_app_router;
use formsmith_api::state::AppState;
use formsmith_core::catalog::FieldCatalog;
use formsmith_db::store::{FormStore, JsonFileStore, PgFormStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "formsmith_api=debug,formsmith_db=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = open_store(&config.store).await;

    // --- App state ---
    let state = AppState {
        store: Arc::clone(&store),
        catalog: Arc::new(FieldCatalog::default()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let cleanup = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        store.close(),
    );
    if cleanup.await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Store did not close before the shutdown timeout",
        );
    }

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured storage backend. Postgres is health-checked and
/// migrated before the server starts.
async fn open_store(backend: &StoreBackend) -> Arc<dyn FormStore> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = formsmith_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            formsmith_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            formsmith_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgFormStore::new(pool))
        }
        StoreBackend::File { path } => {
            tracing::info!(path = %path.display(), "Using JSON file form store");
            Arc::new(JsonFileStore::new(path.clone()))
        }
    }
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
