// SQLite connection pool and per-request sessions

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

/// A short-lived handle scoped to one logical operation.
///
/// Changes become visible only after `commit()`. Dropping the session
/// without committing rolls back and returns the connection to the pool.
pub type Session = Transaction<'static, Sqlite>;

const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
    ),
    (
        "posts",
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES users(id)
        )
        "#,
    ),
    (
        "idx_posts_user_id",
        "CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts (user_id)",
    ),
];

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: SqlitePool,
}

impl DbPool {
    /// Create a new database connection pool
    ///
    /// The database file is created if it does not exist. In-memory URLs are
    /// pinned to a single long-lived connection, since every SQLite memory
    /// connection would otherwise see its own empty database.
    ///
    /// # Errors
    /// Returns `DatabaseError::ConnectionFailed` if the URL is invalid or the
    /// database cannot be opened
    #[instrument(skip(config), fields(max_connections = config.max_connections))]
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing database connection pool");

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(config.foreign_keys);

        let in_memory = is_in_memory(&config.url);
        let mut pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds));

        pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create database pool");
            DatabaseError::ConnectionFailed(e.to_string())
        })?;

        info!(
            in_memory,
            foreign_keys = config.foreign_keys,
            "Database connection pool initialized successfully"
        );

        Ok(Self { pool })
    }

    /// Get a reference to the underlying pool
    ///
    /// Repositories use this for single-statement reads
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a session for one logical operation
    ///
    /// Never read through `pool()` while a session is held: an in-memory
    /// database has only one connection.
    #[instrument(skip(self))]
    pub async fn session(&self) -> Result<Session, DatabaseError> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin session");
            DatabaseError::TransactionFailed(e.to_string())
        })
    }

    /// Create the `users` and `posts` tables if they are absent
    #[instrument(skip(self))]
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        for (name, ddl) in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await.map_err(|e| {
                tracing::error!(error = %e, object = name, "Failed to create schema object");
                DatabaseError::SchemaInitFailed(format!("{name}: {e}"))
            })?;
        }

        info!("Database schema ready");
        Ok(())
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::HealthCheckFailed(e.to_string())
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
