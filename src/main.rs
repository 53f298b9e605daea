//! Book Reviews - A CRUD service for books and their reviews
//!
//! Serves the book review REST API with a cache-aside book listing.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_reviews::api::create_router;
use book_reviews::cache::{CacheGateway, KeyValueStore, MemoryStore, RedisStore};
use book_reviews::config::CacheBackend;
use book_reviews::store::Database;
use book_reviews::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the book review service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the database and apply the schema
/// 4. Build the cache backend (and its sweep task for the memory backend)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "book_reviews=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting book review service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, database={}, cache_backend={:?}, cache_ttl={}s, read_failure_policy={:?}",
        config.server_port,
        config.database_url,
        config.cache_backend,
        config.cache_ttl,
        config.read_failure_policy
    );

    let db = Database::open(&config.database_url)
        .with_context(|| format!("failed to open database at {}", config.database_url))?;
    info!("Database ready");

    let (store, sweeper): (Arc<dyn KeyValueStore>, Option<JoinHandle<()>>) =
        match config.cache_backend {
            CacheBackend::Redis => {
                let settings = config.redis_settings();
                let store = RedisStore::new(&settings).context("invalid redis settings")?;
                info!("Using redis cache at {}", settings.url());
                (Arc::new(store) as Arc<dyn KeyValueStore>, None)
            }
            CacheBackend::Memory => {
                let store = Arc::new(MemoryStore::new());
                let handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
                info!("Using in-process cache");
                (store as Arc<dyn KeyValueStore>, Some(handle))
            }
        };

    let cache = CacheGateway::new(store).with_timeout(config.cache_timeout());
    let state = AppState::from_config(&config, db, cache);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cache sweep task if one is running.
async fn shutdown_signal(sweeper: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweeper {
        handle.abort();
        warn!("Cache sweep task aborted");
    }
}
