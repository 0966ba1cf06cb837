/// Shared application state
use roster_core::UserService;
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self {
            users,
            started_at: Instant::now(),
        }
    }
}
