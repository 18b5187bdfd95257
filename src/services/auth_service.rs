//! Authentication service - Registration and login.
//!
//! Hashing and verification run on the blocking thread pool since
//! Argon2 is deliberately CPU- and memory-heavy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{MSG_LOGIN_FIELDS_REQUIRED, MSG_REGISTER_FIELDS_REQUIRED};
use crate::domain::user::all_present;
use crate::domain::{HashCost, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<User>;

    /// Verify credentials and return the stored username
    async fn login(&self, email: String, password: String) -> AppResult<String>;
}

/// Concrete implementation of AuthService over a credential store.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    cost: HashCost,
    // Verified against when the email is unknown, so both failure
    // paths pay for one Argon2 run.
    dummy: Password,
}

impl Authenticator {
    /// Create new auth service instance.
    ///
    /// # Errors
    /// Fails if `cost` is outside Argon2's accepted range.
    pub fn new(users: Arc<dyn UserRepository>, cost: HashCost) -> AppResult<Self> {
        let dummy = Password::new("dummy-password-for-unknown-accounts", &cost)?;
        Ok(Self { users, cost, dummy })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<User> {
        if !all_present(&[username.as_str(), email.as_str(), password.as_str()]) {
            return Err(AppError::validation(MSG_REGISTER_FIELDS_REQUIRED));
        }

        // Fast path; the unique index catches concurrent inserts
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let cost = self.cost;
        let password_hash = tokio::task::spawn_blocking(move || Password::new(&password, &cost))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))??
            .into_string();

        let user = self.users.create(username, email, password_hash).await?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<String> {
        if !all_present(&[email.as_str(), password.as_str()]) {
            return Err(AppError::validation(MSG_LOGIN_FIELDS_REQUIRED));
        }

        let user = self.users.find_by_email(&email).await?;

        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => self.dummy.clone(),
        };

        let password_valid = tokio::task::spawn_blocking(move || stored.verify(&password))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))?;

        match user {
            Some(user) if password_valid => {
                tracing::debug!(user_id = user.id, "Login succeeded");
                Ok(user.username)
            }
            _ => {
                tracing::debug!("Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::infra::MockUserRepository;

    const TEST_COST: HashCost = HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };

    fn stored_user(username: &str, email: &str, password: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: Password::new(password, &TEST_COST).unwrap().into_string(),
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository) -> Authenticator {
        Authenticator::new(Arc::new(repo), TEST_COST).unwrap()
    }

    #[tokio::test]
    async fn test_register_hashes_and_inserts() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .withf(|username, email, hash| {
                username == "alice"
                    && email == "a@x.com"
                    && hash != "secret1"
                    && Password::from_hash(hash.clone()).verify("secret1")
            })
            .returning(|username, email, password_hash| {
                Ok(User {
                    id: 7,
                    username,
                    email,
                    password_hash,
                    created_at: Utc::now(),
                })
            });

        let user = service(repo)
            .register("alice".into(), "a@x.com".into(), "secret1".into())
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_skips_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("alice", "a@x.com", "secret1"))));
        repo.expect_create().never();

        let result = service(repo)
            .register("bob".into(), "a@x.com".into(), "other-pass".into())
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_insert_race_reports_duplicate() {
        // Another request inserted between the check and our insert
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_, _, _| Err(AppError::DuplicateEmail));

        let result = service(repo)
            .register("alice".into(), "a@x.com".into(), "secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_missing_field_never_touches_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();
        repo.expect_create().never();
        let service = service(repo);

        for (username, email, password) in [
            ("", "a@x.com", "secret1"),
            ("alice", "", "secret1"),
            ("alice", "a@x.com", ""),
        ] {
            let result = service
                .register(username.into(), email.into(), password.into())
                .await;

            match result {
                Err(AppError::Validation(msg)) => assert_eq!(msg, MSG_REGISTER_FIELDS_REQUIRED),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_register_store_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::StoreTimeout));
        repo.expect_create().never();

        let result = service(repo)
            .register("alice".into(), "a@x.com".into(), "secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::StoreTimeout)));
    }

    #[tokio::test]
    async fn test_login_returns_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@x.com"))
            .returning(|_| Ok(Some(stored_user("alice", "a@x.com", "secret1"))));

        let username = service(repo)
            .login("a@x.com".into(), "secret1".into())
            .await
            .unwrap();

        assert_eq!(username, "alice");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_match() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("a@x.com"))
            .returning(|_| Ok(Some(stored_user("alice", "a@x.com", "secret1"))));
        repo.expect_find_by_email()
            .with(eq("nobody@x.com"))
            .returning(|_| Ok(None));
        let service = service(repo);

        let wrong_password = service
            .login("a@x.com".into(), "wrong".into())
            .await
            .unwrap_err();
        let unknown_email = service
            .login("nobody@x.com".into(), "secret1".into())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_rejects_dummy_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = service(repo)
            .login(
                "nobody@x.com".into(),
                "dummy-password-for-unknown-accounts".into(),
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_missing_field_never_touches_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();
        let service = service(repo);

        for (email, password) in [("", "secret1"), ("a@x.com", "")] {
            let result = service.login(email.into(), password.into()).await;

            match result {
                Err(AppError::Validation(msg)) => assert_eq!(msg, MSG_LOGIN_FIELDS_REQUIRED),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_invalid_cost_rejected_at_construction() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };

        let result = Authenticator::new(Arc::new(MockUserRepository::new()), cost);
        assert!(result.is_err());
    }
}
