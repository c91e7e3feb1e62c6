//! Application builder: wires collaborators, state, and router into a
//! running server.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info};

use grader_cache::provider::CacheManager;
use grader_core::config::AppConfig;
use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;
use grader_database::connection::DatabasePool;
use grader_database::memory::{MemorySolutionQueue, MemoryTaskCatalog, MemoryUserDirectory};
use grader_database::migration::run_migrations;
use grader_database::repositories::{SolutionRepository, TaskRepository, UserRepository};
use grader_database::traits::{PrincipalDirectory, SolutionQueue, TaskCatalog};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Directory, catalog, and queue for the configured database provider.
struct Persistence {
    directory: Arc<dyn PrincipalDirectory>,
    tasks: Arc<dyn TaskCatalog>,
    solutions: Arc<dyn SolutionQueue>,
    pool: Option<DatabasePool>,
}

async fn init_persistence(config: &AppConfig) -> AppResult<Persistence> {
    match config.database.provider.as_str() {
        "postgres" => {
            let pool = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                run_migrations(pool.pool()).await?;
            }
            Ok(Persistence {
                directory: Arc::new(UserRepository::new(pool.pool().clone())),
                tasks: Arc::new(TaskRepository::new(pool.pool().clone())),
                solutions: Arc::new(SolutionRepository::new(pool.pool().clone())),
                pool: Some(pool),
            })
        }
        "memory" => {
            info!("Using in-memory directory, catalog, and queue");
            Ok(Persistence {
                directory: Arc::new(MemoryUserDirectory::new()),
                tasks: Arc::new(MemoryTaskCatalog::new()),
                solutions: Arc::new(MemorySolutionQueue::new()),
                pool: None,
            })
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider: '{other}'"
        ))),
    }
}

/// Runs the grader server until Ctrl-C or SIGTERM, then closes the session
/// store and the database pool.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    info!("Starting grader v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Directory, catalog, queue ────────────────────────
    info!(provider = %config.database.provider, "Initializing persistence");
    let persistence = init_persistence(&config).await?;

    // ── Step 2: Session backend ──────────────────────────────────
    info!(provider = %config.cache.provider, "Initializing session backend");
    let backend: Arc<dyn HashStore> = Arc::new(CacheManager::new(&config.cache).await?);

    // ── Step 3: Auth core + state ────────────────────────────────
    let addr = config.server.bind_address();
    let mut state = AppState::new(
        config,
        backend,
        persistence.directory,
        persistence.tasks,
        persistence.solutions,
    )?;
    if let Some(pool) = &persistence.pool {
        state = state.with_database(pool.clone());
    }
    let session_store = Arc::clone(&state.session_store);

    // ── Step 4: Serve ────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Grader listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Release connections ──────────────────────────────
    info!("Shutting down");
    if let Err(e) = session_store.close().await {
        error!(error = %e, "Failed to close session store");
    }
    if let Some(pool) = persistence.pool {
        pool.close().await;
    }

    info!("Grader shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
