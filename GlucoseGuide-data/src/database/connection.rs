//! Database connection module for the GlucoseGuide application
//!
//! The pool is created once at startup and handed to repositories explicitly.
//! Every unit of work checks out its own connection, runs inside a single
//! transaction and returns the connection to the pool when it finishes,
//! whatever the outcome.

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags, Transaction};
use thiserror::Error;
use tracing::{debug, error, info};

use super::migrations::run_sqlite_migrations;
use crate::repository::RepositoryError;

/// Path value that selects a private in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection checkout timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/glucose_data.db".to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);
        if sqlite_path.trim().is_empty() {
            return Err(DatabaseError::ConfigError("DB_SQLITE_PATH is empty".to_string()));
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_connections);

        let timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        info!(
            "Database configuration: path={}, max_connections={}, timeout={}s",
            sqlite_path, max_connections, timeout_seconds
        );

        Ok(Self {
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }

    /// Whether this configuration selects an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.sqlite_path == IN_MEMORY_PATH
    }
}

/// Per-connection setup applied by the pool manager.
///
/// Records carry a placeholder owner that need not exist in `users`, so the
/// bundled SQLite's default foreign key enforcement is switched off.
fn init_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")
}

/// Shared handle to the SQLite connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.pool.state();
        f.debug_struct("DatabasePool")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl DatabasePool {
    /// Open the pool described by `config` and bring the schema up to date
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_in_memory() {
            return Self::in_memory();
        }

        info!("Initializing SQLite database at: {}", config.sqlite_path);

        if let Some(parent) = Path::new(&config.sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::ConfigError(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(&config.sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(init_connection);

        let pool = r2d2::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)
            .map_err(|e| {
                error!("Failed to create SQLite connection pool: {}", e);
                DatabaseError::SqlitePoolError(e)
            })?;

        let pool = Self { pool };
        pool.migrate()?;

        info!("SQLite connection pool created successfully");
        Ok(pool)
    }

    /// Open a private in-memory database.
    ///
    /// Each in-memory SQLite connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        info!("Initializing in-memory SQLite database");

        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory().with_init(init_connection))?;

        let pool = Self { pool };
        pool.migrate()?;

        info!("In-memory SQLite database initialized successfully");
        Ok(pool)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        let conn = self.pool.get()?;
        run_sqlite_migrations(&conn).map_err(|e| DatabaseError::MigrationError(e.to_string()))
    }

    /// Check out a connection from the pool
    pub fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, r2d2::Error> {
        self.pool.get()
    }

    /// Run `work` inside one transaction on a pooled connection.
    ///
    /// The transaction commits only when `work` succeeds; any error drops it,
    /// which rolls it back. The blocking SQLite calls run on tokio's blocking
    /// thread pool and the connection goes back to the pool on every path.
    pub async fn run_in_transaction<T, F>(
        &self,
        operation: &'static str,
        work: F,
    ) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> Result<T, RepositoryError> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<T, RepositoryError> {
            debug!(operation, "Opening transaction");
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let value = work(&tx)?;
            tx.commit()?;
            debug!(operation, "Transaction committed");
            Ok(value)
        })
        .await
        .map_err(|e| RepositoryError::Task(e.to_string()))?
    }

    /// Verify that a pooled connection can run a trivial query
    pub fn check(&self) -> Result<(), DatabaseError> {
        let conn = self.pool.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Get information about the current database connection
    pub fn connection_info(&self) -> String {
        let location = match self.pool.get() {
            Ok(conn) => match conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2)) {
                Ok(path) if path.is_empty() || path == IN_MEMORY_PATH => {
                    "SQLite in-memory database".to_string()
                }
                Ok(path) => format!("SQLite database at {}", path),
                Err(_) => "SQLite database (path unknown)".to_string(),
            },
            Err(e) => {
                error!("Failed to get SQLite connection: {}", e);
                return format!("SQLite connection error: {}", e);
            }
        };

        let state = self.pool.state();
        format!(
            "{} (connections: active={}, idle={})",
            location, state.connections, state.idle_connections
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.sqlite_path, "data/glucose_data.db");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_pool_is_migrated() {
        let pool = DatabasePool::in_memory().unwrap();
        assert!(pool.check().is_ok());

        let conn = pool.get_connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM glucose_records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        drop(conn);

        assert!(pool.connection_info().contains("in-memory"));
    }

    #[test]
    fn test_file_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("glucose.db");
        let config = DatabaseConfig {
            sqlite_path: path.to_string_lossy().to_string(),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let pool = DatabasePool::connect(&config).unwrap();
        assert!(pool.check().is_ok());
        assert!(path.exists());
    }

    fn foreign_keys_enabled(pool: &DatabasePool) -> i64 {
        let conn = pool.get_connection().unwrap();
        conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap()
    }

    #[tokio::test]
    async fn test_record_without_owner_row_is_accepted() {
        let pool = DatabasePool::in_memory().unwrap();
        assert_eq!(foreign_keys_enabled(&pool), 0);

        let id = pool
            .run_in_transaction("test_orphan_insert", |tx| {
                tx.execute(
                    "INSERT INTO glucose_records (user_id, glucose_level, date) VALUES (1, 120.0, '2024-01-01 10:30:00.000000')",
                    [],
                )?;
                Ok(tx.last_insert_rowid())
            })
            .await
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_file_pool_does_not_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            sqlite_path: dir.path().join("glucose.db").to_string_lossy().to_string(),
            max_connections: 2,
            timeout_seconds: 5,
        };

        let pool = DatabasePool::connect(&config).unwrap();
        assert_eq!(foreign_keys_enabled(&pool), 0);
    }

    #[tokio::test]
    async fn test_failed_work_rolls_back() {
        let pool = DatabasePool::in_memory().unwrap();

        let result: Result<(), RepositoryError> = pool
            .run_in_transaction("test_rollback", |tx| {
                tx.execute(
                    "INSERT INTO users (email, diabetes_type) VALUES ('a@example.com', 'Type 1')",
                    [],
                )?;
                Err(RepositoryError::NotFound(7))
            })
            .await;
        assert!(result.is_err());

        let conn = pool.get_connection().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
