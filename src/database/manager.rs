use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StorageBackend};
use crate::database::memory::InMemoryAuthorStore;
use crate::database::postgres::PgAuthorStore;
use crate::database::store::AuthorStore;

/// Errors raised while opening storage at startup
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the configured storage backend
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn AuthorStore>, DatabaseError> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory author store (data is lost on restart)");
                Ok(Arc::new(InMemoryAuthorStore::new()))
            }
            StorageBackend::Postgres => {
                let url = config
                    .url
                    .as_deref()
                    .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
                let redacted = Self::redact(url)?;

                // Lazy so the server can boot (and report degraded health) while the database is down
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect_lazy(url)?;

                info!("Created database pool for: {}", redacted);
                Ok(Arc::new(PgAuthorStore::new(pool)))
            }
        }
    }

    /// Validate the URL and strip credentials so it can be logged
    fn redact(url: &str) -> Result<String, DatabaseError> {
        let mut parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if parsed.password().is_some() {
            parsed
                .set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(parsed.to_string())
    }
}
