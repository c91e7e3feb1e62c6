//! Application state shared across all handlers and extractors.

use std::sync::Arc;
use std::time::Duration;

use grader_auth::{AuthenticationGate, SessionManager, SessionStore, TokenDecoder, TokenEncoder};
use grader_core::config::AppConfig;
use grader_core::result::AppResult;
use grader_core::traits::hash_store::HashStore;
use grader_database::connection::DatabasePool;
use grader_database::traits::{PrincipalDirectory, SolutionQueue, TaskCatalog};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Per-request authentication pipeline
    pub gate: Arc<AuthenticationGate>,
    /// Signup, login, and logout flows
    pub session_manager: Arc<SessionManager>,
    /// Session liveness records
    pub session_store: Arc<SessionStore>,

    /// Gradable tasks
    pub task_catalog: Arc<dyn TaskCatalog>,
    /// Submissions awaiting the grading worker
    pub solution_queue: Arc<dyn SolutionQueue>,
    /// PostgreSQL pool, absent on the in-memory provider
    pub database: Option<DatabasePool>,
}

impl AppState {
    /// Wires the auth core over the given collaborators.
    ///
    /// Fails if the signing configuration is unusable.
    pub fn new(
        config: AppConfig,
        session_backend: Arc<dyn HashStore>,
        directory: Arc<dyn PrincipalDirectory>,
        task_catalog: Arc<dyn TaskCatalog>,
        solution_queue: Arc<dyn SolutionQueue>,
    ) -> AppResult<Self> {
        config.auth.validate()?;

        let encoder = Arc::new(TokenEncoder::new(&config.auth)?);
        let decoder = Arc::new(TokenDecoder::new(&config.auth)?);
        let session_store = Arc::new(SessionStore::new(session_backend, &config.session));

        let session_manager = Arc::new(SessionManager::new(
            encoder,
            Arc::clone(&session_store),
            Arc::clone(&directory),
            &config.auth,
            &config.session,
        ));
        let gate = Arc::new(AuthenticationGate::new(
            decoder,
            Arc::clone(&session_store),
            directory,
            &config.session,
        ));

        Ok(Self {
            config: Arc::new(config),
            gate,
            session_manager,
            session_store,
            task_catalog,
            solution_queue,
            database: None,
        })
    }

    /// Attaches the PostgreSQL pool so health checks can report on it.
    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }

    /// Upper bound for each catalog, queue, or database call.
    pub fn operation_timeout(&self) -> Duration {
        self.config.session.operation_timeout()
    }
}
