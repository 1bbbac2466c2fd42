//! Database primitives shared by the onboarding service.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use serde::Deserialize;
use thiserror::Error;

/// Shared connection pool. Every call checks a connection out and returns it
/// on drop, whichever way the call exits.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Query(DbErr),
}

impl From<DbErr> for DbError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::UniqueViolation(detail),
            _ => Self::Query(err),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Connection settings, assembled by the binary from its environment.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Builds a Postgres URL from discrete host/user/password/name parts.
    pub fn from_parts(host: &str, user: &str, password: &str, name: &str) -> Self {
        let credentials = if password.is_empty() {
            user.to_string()
        } else {
            format!("{user}:{password}")
        };
        Self::new(format!("postgres://{credentials}@{host}/{name}"))
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    if settings.url.trim().is_empty() {
        return Err(DbError::MissingUrl);
    }
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .sqlx_logging(false);
    let pool = Database::connect(options).await?;
    tracing::debug!(max_connections = settings.max_connections, "database pool ready");
    Ok(pool)
}
