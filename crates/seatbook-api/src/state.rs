//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use seatbook_auth::IdentityProvider;
use seatbook_core::config::AppConfig;
use seatbook_database::DocumentStore;
use seatbook_service::ReservationCoordinator;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Document store backing seats and employees
    pub store: Arc<dyn DocumentStore>,
    /// Booking workflows
    pub coordinator: Arc<ReservationCoordinator>,
    /// Bearer credential verification
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wire the coordinator to `store` using the seating settings in `config`.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let coordinator = Arc::new(ReservationCoordinator::new(
            Arc::clone(&store),
            &config.seating,
        ));
        Self {
            config: Arc::new(config),
            store,
            coordinator,
            identity,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.store.backend_name())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
