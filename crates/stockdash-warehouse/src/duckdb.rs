//! `DuckDB` connection pool management.
//!
//! A DuckDB database may only be opened once per process for writing, so
//! every pooled connection is cloned from a single root handle instead of
//! reopening the file.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ::duckdb::Connection;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// File-backed database.
    File(PathBuf),
    /// Private in-memory database, shared by every connection of one manager.
    InMemory,
}

struct PoolInner {
    location: DbLocation,
    max_pool_size: usize,
    root: Mutex<Connection>,
    idle: Mutex<Vec<Connection>>,
}

/// A connection pool manager for `DuckDB` connections.
#[derive(Clone)]
pub struct DuckDbConnectionManager {
    inner: Arc<PoolInner>,
}

impl DuckDbConnectionManager {
    /// Open the database and create a pool around it.
    ///
    /// # Arguments
    /// * `location` - File path or in-memory database
    /// * `max_pool_size` - Maximum number of idle connections kept for reuse
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or configured.
    pub fn open(location: DbLocation, max_pool_size: usize) -> Result<Self, ::duckdb::Error> {
        let root = match &location {
            DbLocation::File(path) => Connection::open(path)?,
            DbLocation::InMemory => Connection::open_in_memory()?,
        };
        configure_connection(&root)?;

        Ok(Self {
            inner: Arc::new(PoolInner {
                location,
                max_pool_size: max_pool_size.max(1),
                root: Mutex::new(root),
                idle: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Acquire a connection from the pool.
    ///
    /// # Errors
    /// Returns an error if a new connection cannot be cloned from the root handle.
    ///
    /// # Panics
    /// Panics if a pool mutex is poisoned (indicating a previous panic
    /// while holding the lock).
    pub fn acquire(&self) -> Result<PooledConnection, ::duckdb::Error> {
        let reused = self
            .inner
            .idle
            .lock()
            .expect("duckdb connection pool mutex poisoned")
            .pop();

        let connection = match reused {
            Some(connection) => connection,
            None => {
                let root = self
                    .inner
                    .root
                    .lock()
                    .expect("duckdb root connection mutex poisoned");
                let connection = root.try_clone()?;
                configure_connection(&connection)?;
                connection
            }
        };

        Ok(PooledConnection {
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    /// Get the path to the database file, if file-backed.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        match &self.inner.location {
            DbLocation::File(path) => Some(path.as_path()),
            DbLocation::InMemory => None,
        }
    }
}

/// A pooled connection that returns to the pool when dropped.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("pooled connection unexpectedly missing")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("pooled connection unexpectedly missing")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let Ok(mut idle) = self.pool.idle.lock() else {
            return;
        };
        if idle.len() < self.pool.max_pool_size {
            idle.push(connection);
        }
    }
}

fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")
}
