//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::domain::HashCost;
use crate::errors::AppResult;
use crate::infra::UserRepository;
use crate::services::{AuthService, Authenticator};

/// Application state shared by all handlers.
///
/// Holds no mutable data; every request works against the injected store.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Credential store, used directly for health checks
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Build state around a credential store, wiring the default authenticator.
    pub fn from_store(users: Arc<dyn UserRepository>, cost: HashCost) -> AppResult<Self> {
        let auth_service = Arc::new(Authenticator::new(users.clone(), cost)?);
        Ok(Self::new(auth_service, users))
    }

    /// Create new application state with manually injected services.
    pub fn new(auth_service: Arc<dyn AuthService>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            auth_service,
            users,
        }
    }
}
