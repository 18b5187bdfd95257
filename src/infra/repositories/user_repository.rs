//! User repository - the credential store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::db;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Implementations must reject a second record with an email that is
/// already stored, returning [`AppError::DuplicateEmail`] from `create`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by exact email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user record.
    ///
    /// A store timeout does not cancel a statement the driver already sent,
    /// so an insert that times out may still commit. Implementations report
    /// such an insert as created once the row is visible.
    async fn create(&self, username: String, email: String, password_hash: String)
        -> AppResult<User>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
    timeout: Duration,
}

impl UserStore {
    /// Create new repository instance; every call is bounded by `timeout`.
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn bounded<T, F>(&self, op: F) -> AppResult<Result<T, DbErr>>
    where
        F: Future<Output = Result<T, DbErr>> + Send,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| AppError::StoreTimeout)
    }

    /// Resolve an insert whose timeout elapsed. The salted hash is unique to
    /// this registration, so a stored row carrying it is our own insert.
    async fn confirm_timed_out_insert(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        tracing::warn!("Insert timed out, checking whether it was applied");
        match self.find_by_email(email).await {
            Ok(Some(user)) if user.password_hash == password_hash => Ok(user),
            _ => Err(AppError::StoreTimeout),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = self
            .bounded(
                UserEntity::find()
                    .filter(user::Column::Email.eq(email))
                    .one(&self.db),
            )
            .await??;

        Ok(result.map(User::from))
    }

    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        let active_model = ActiveModel {
            username: Set(username),
            email: Set(email.clone()),
            password_hash: Set(password_hash.clone()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let inserted = match self.bounded(active_model.insert(&self.db)).await {
            Err(AppError::StoreTimeout) => {
                return self.confirm_timed_out_insert(&email, &password_hash).await;
            }
            other => other?,
        };

        match inserted {
            Ok(model) => Ok(User::from(model)),
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::DuplicateEmail),
                _ => Err(AppError::from(e)),
            },
        }
    }

    async fn ping(&self) -> AppResult<()> {
        self.bounded(db::ping(&self.db)).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::db::Database;
    use sea_orm::ConnectOptions;

    async fn sqlite_store() -> UserStore {
        let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
        options.max_connections(1).sqlx_logging(false);

        let connection = sea_orm::Database::connect(options).await.unwrap();
        let db = Database::from_connection(connection);
        db.run_migrations().await.unwrap();
        UserStore::new(db.get_connection(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_bounded_reports_elapsed_timeout() {
        let store = UserStore::new(DatabaseConnection::Disconnected, Duration::from_millis(10));

        let result = store
            .bounded(std::future::pending::<Result<(), DbErr>>())
            .await;

        assert!(matches!(result, Err(AppError::StoreTimeout)));
    }

    #[tokio::test]
    async fn test_bounded_passes_completed_result_through() {
        let store = UserStore::new(DatabaseConnection::Disconnected, Duration::from_secs(1));

        let result = store.bounded(async { Ok::<_, DbErr>(7) }).await;

        assert!(matches!(result, Ok(Ok(7))));
    }

    #[tokio::test]
    async fn test_timed_out_insert_that_committed_counts_as_created() {
        let store = sqlite_store().await;
        let created = store
            .create("alice".into(), "a@x.com".into(), "$argon2id$salted".into())
            .await
            .unwrap();

        let confirmed = store
            .confirm_timed_out_insert("a@x.com", "$argon2id$salted")
            .await
            .unwrap();

        assert_eq!(confirmed.id, created.id);
        assert_eq!(confirmed.username, "alice");
    }

    #[tokio::test]
    async fn test_timed_out_insert_without_own_row_stays_timeout() {
        let store = sqlite_store().await;
        store
            .create("bob".into(), "taken@x.com".into(), "$argon2id$other".into())
            .await
            .unwrap();

        let missing = store
            .confirm_timed_out_insert("a@x.com", "$argon2id$salted")
            .await;
        let someone_else = store
            .confirm_timed_out_insert("taken@x.com", "$argon2id$salted")
            .await;

        assert!(matches!(missing, Err(AppError::StoreTimeout)));
        assert!(matches!(someone_else, Err(AppError::StoreTimeout)));
    }
}
