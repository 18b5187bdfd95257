//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use super::constants::{
    DEFAULT_ARGON2_ITERATIONS, DEFAULT_ARGON2_MEMORY_KIB, DEFAULT_ARGON2_PARALLELISM,
    DEFAULT_DB_BACKEND, DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_USER, DEFAULT_MYSQL_PORT,
    DEFAULT_POSTGRES_PORT, DEFAULT_STORE_TIMEOUT_SECONDS,
};
use crate::domain::HashCost;
use crate::errors::{AppError, AppResult};

/// Supported relational backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    MySql,
}

impl DatabaseBackend {
    /// URL scheme understood by the SeaORM drivers
    pub fn scheme(&self) -> &'static str {
        match self {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
        }
    }

    /// Well-known port for this backend
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseBackend::Postgres => DEFAULT_POSTGRES_PORT,
            DatabaseBackend::MySql => DEFAULT_MYSQL_PORT,
        }
    }
}

impl FromStr for DatabaseBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
            "mysql" => Ok(DatabaseBackend::MySql),
            other => Err(AppError::internal(format!(
                "Unsupported database backend: {}",
                other
            ))),
        }
    }
}

/// Connection settings for the credential store.
///
/// Recognized options are `host`, `user`, `password` and `database`,
/// plus the port and backend. A full `DATABASE_URL` takes precedence
/// over the individual parts when present.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    pub host: String,
    pub port: u16,
    pub user: String,
    password: String,
    pub database: String,
    url_override: Option<String>,
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("url_override", &self.url_override.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl DatabaseSettings {
    /// Build settings from explicit parts.
    pub fn new(
        backend: DatabaseBackend,
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            url_override: None,
        }
    }

    /// Use a complete connection URL instead of the individual parts.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url_override = Some(url.into());
        self
    }

    /// Assemble the connection URL, percent-encoding the credentials.
    pub fn connection_url(&self) -> AppResult<String> {
        if let Some(url) = &self.url_override {
            return Ok(url.clone());
        }

        let invalid = |part: &str| AppError::internal(format!("Invalid database {}", part));

        let mut url = Url::parse(&format!("{}://{}", self.backend.scheme(), self.host))
            .map_err(|e| AppError::internal(format!("Invalid database host: {}", e)))?;
        url.set_port(Some(self.port)).map_err(|_| invalid("port"))?;
        url.set_username(&self.user).map_err(|_| invalid("user"))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| invalid("password"))?;
        }
        url.set_path(&format!("/{}", self.database));

        Ok(url.to_string())
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub store_timeout_seconds: u64,
    pub hash_cost: HashCost,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one exists. Unparseable numeric values
    /// fall back to their defaults; an unknown backend falls back to PostgreSQL.
    /// The listen address is a `serve` argument (`SERVER_HOST`/`SERVER_PORT`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let backend_name =
            env::var("DB_BACKEND").unwrap_or_else(|_| DEFAULT_DB_BACKEND.to_string());
        let backend = backend_name.parse().unwrap_or_else(|_: AppError| {
            tracing::warn!("Unsupported DB_BACKEND {:?}, falling back to postgres", backend_name);
            DatabaseBackend::Postgres
        });

        let mut database = DatabaseSettings::new(
            backend,
            env::var("DB_HOST").unwrap_or_else(|_| DEFAULT_DB_HOST.to_string()),
            parse_var("DB_PORT").unwrap_or_else(|| backend.default_port()),
            env::var("DB_USER").unwrap_or_else(|_| DEFAULT_DB_USER.to_string()),
            env::var("DB_PASSWORD").unwrap_or_default(),
            env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
        );
        if let Ok(url) = env::var("DATABASE_URL") {
            database = database.with_url(url);
        }

        Self {
            database,
            store_timeout_seconds: parse_var("STORE_TIMEOUT_SECONDS")
                .unwrap_or(DEFAULT_STORE_TIMEOUT_SECONDS),
            hash_cost: HashCost {
                memory_kib: parse_var("ARGON2_MEMORY_KIB").unwrap_or(DEFAULT_ARGON2_MEMORY_KIB),
                iterations: parse_var("ARGON2_ITERATIONS").unwrap_or(DEFAULT_ARGON2_ITERATIONS),
                parallelism: parse_var("ARGON2_PARALLELISM")
                    .unwrap_or(DEFAULT_ARGON2_PARALLELISM),
            },
        }
    }

    /// Upper bound applied to every store call.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_seconds)
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
