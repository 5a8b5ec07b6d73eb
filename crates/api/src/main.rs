use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beatstore_api::config::{ServerConfig, StoreBackend};
use beatstore_api::router::build_app_router;
use beatstore_api::state::AppState;
use beatstore_db::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use beatstore_events::{EmailConfig, EmailDelivery, EventBus, EventPersistence, Notifier};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beatstore_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        store = config.store_backend.as_str(),
        "Loaded server configuration"
    );

    // --- Document store ---
    let store = open_store(&config).await;

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let events_cancel = CancellationToken::new();

    // Spawn event persistence (writes all events to the events collection).
    let persistence_handle = tokio::spawn(EventPersistence::run(
        Arc::clone(&store),
        event_bus.subscribe(),
        events_cancel.clone(),
    ));

    // Spawn the email notifier when SMTP is configured.
    let notifier_handle = match EmailConfig::from_env() {
        Some(email_config) => {
            tracing::info!(smtp_host = %email_config.smtp_host, "Email notifications enabled");
            let notifier = Notifier::new(EmailDelivery::new(email_config), Arc::clone(&store));
            Some(tokio::spawn(
                notifier.run(event_bus.subscribe(), events_cancel.clone()),
            ))
        }
        None => {
            tracing::info!("SMTP_HOST not set, email notifications disabled");
            None
        }
    };

    tracing::info!("Event services started");

    // --- App state and router ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, Arc::clone(&event_bus), config.clone());
    if state.uploads.is_none() {
        tracing::warn!("UPLOAD_PROXY_URL not set, file uploads are disabled");
    }
    let app = build_app_router(state, &config);

    // --- Start server ---
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

    events_cancel.cancel();
    let _ = tokio::time::timeout(shutdown_timeout, persistence_handle).await;
    if let Some(handle) = notifier_handle {
        let _ = tokio::time::timeout(shutdown_timeout, handle).await;
    }
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Open the configured document store. PostgreSQL is connected, probed and
/// migrated before the server starts.
async fn open_store(config: &ServerConfig) -> Arc<dyn DocumentStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set when STORE_BACKEND=postgres");

            let pool = beatstore_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            beatstore_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            beatstore_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgDocumentStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory document store; data is lost on restart");
            Arc::new(MemoryDocumentStore::new())
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
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
