//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::repositories::AccountStore;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since every member is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Account store, probed directly by the health endpoints
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn new(services: Services, accounts: Arc<dyn AccountStore>) -> Self {
        Self { services, accounts }
    }
}
