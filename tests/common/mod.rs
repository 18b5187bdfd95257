//! Shared test fixtures.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use credential_service::domain::{HashCost, User};
use credential_service::errors::{AppError, AppResult};
use credential_service::infra::UserRepository;

/// Smallest cost Argon2 accepts, keeps tests fast
pub const TEST_COST: HashCost = HashCost {
    memory_kib: 8,
    iterations: 1,
    parallelism: 1,
};

/// In-memory credential store that enforces email uniqueness like the
/// real unique index and counts every lookup or insert it serves.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    calls: AtomicUsize,
    unavailable: bool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with a driver error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Number of find/create calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.lock().await.clone()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::from(sea_orm::DbErr::Custom(
                "connection refused (os error 111) at 10.1.2.3:5432".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateEmail);
        }

        let user = User {
            id: users.len() as i32 + 1,
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}
