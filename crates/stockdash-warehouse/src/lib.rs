//! # Stockdash Warehouse
//!
//! DuckDB-backed price cache for stockdash.
//!
//! ## Overview
//!
//! The warehouse holds a single table of daily closing prices keyed by
//! `(symbol, date)`. It is used as a read-through cache in front of the
//! market-data provider: rows are inserted when first fetched and are never
//! updated or deleted.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockdash_warehouse::{PriceRecord, Warehouse};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!
//!     let inserted = warehouse.upsert_observations(
//!         "AAPL",
//!         &[PriceRecord::new("2024-01-02", 185.64)],
//!     )?;
//!     println!("inserted {inserted} rows");
//!
//!     for row in warehouse.fetch_observations("AAPL")? {
//!         println!("{} {:.2}", row.date, row.close);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `stock_data` | Daily closes, unique on `(symbol, date)` |
//! | `schema_migrations` | Applied migration versions |

pub mod duckdb;
pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ::duckdb::Connection;
use ::duckdb::ToSql;
use serde::Serialize;
use thiserror::Error;

pub use duckdb::{DbLocation, DuckDbConnectionManager, PooledConnection};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
}

impl WarehouseConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_pool_size: 4,
        }
    }
}

/// A cached closing price as stored for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Closing price.
    pub close: f64,
}

impl PriceRecord {
    pub fn new(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            close,
        }
    }
}

/// A raw `stock_data` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRow {
    pub id: i64,
    pub symbol: String,
    pub date: String,
    pub close: f64,
}

/// The price cache.
#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
    // DuckDB aborts one of two concurrent transactions that insert the same
    // key; serializing writers keeps insert-if-absent conflict free.
    write_lock: Arc<Mutex<()>>,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a file-backed warehouse, creating parent directories as needed.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager =
            DuckDbConnectionManager::open(DbLocation::File(config.db_path), config.max_pool_size)?;
        Self::with_manager(manager)
    }

    /// Open a private in-memory warehouse.
    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let manager = DuckDbConnectionManager::open(DbLocation::InMemory, 2)?;
        Self::with_manager(manager)
    }

    fn with_manager(manager: DuckDbConnectionManager) -> Result<Self, WarehouseError> {
        let warehouse = Self {
            manager,
            write_lock: Arc::new(Mutex::new(())),
        };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Initialize database schema.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file (`None` for in-memory warehouses).
    pub fn db_path(&self) -> Option<&Path> {
        self.manager.db_path()
    }

    /// Insert each observation unless one already exists for the same
    /// `(symbol, date)`. Existing rows are never modified.
    ///
    /// Returns the number of rows actually inserted.
    ///
    /// # Security
    /// All values are passed as query parameters.
    pub fn upsert_observations(
        &self,
        symbol: &str,
        rows: &[PriceRecord],
    ) -> Result<usize, WarehouseError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, WarehouseError> {
            let mut inserted = 0;
            for row in rows {
                let params: [&dyn ToSql; 3] = [&symbol, &row.date, &row.close];
                inserted += connection.execute(
                    "INSERT INTO stock_data (symbol, date, close) \
                     VALUES (?, CAST(? AS DATE), ?) \
                     ON CONFLICT (symbol, date) DO NOTHING",
                    params.as_slice(),
                )?;
            }
            Ok(inserted)
        })();

        finalize_transaction(&connection, result)
    }

    /// All cached observations for `symbol`, oldest first.
    pub fn fetch_observations(&self, symbol: &str) -> Result<Vec<PriceRecord>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT CAST(date AS VARCHAR), close FROM stock_data \
             WHERE symbol = ? ORDER BY date ASC",
        )?;
        let rows = statement
            .query_map([symbol], |row| {
                Ok(PriceRecord {
                    date: row.get(0)?,
                    close: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Up to `limit` raw rows across all symbols, ordered by symbol then
    /// newest date first.
    pub fn stored_rows(&self, limit: usize) -> Result<Vec<StoredRow>, WarehouseError> {
        let connection = self.manager.acquire()?;
        query_stored_rows(
            &connection,
            "SELECT id, symbol, CAST(date AS VARCHAR), close FROM stock_data \
             ORDER BY symbol ASC, date DESC LIMIT ?",
            limit,
        )
    }

    /// The first `limit` rows in insertion order.
    pub fn sample_rows(&self, limit: usize) -> Result<Vec<StoredRow>, WarehouseError> {
        let connection = self.manager.acquire()?;
        query_stored_rows(
            &connection,
            "SELECT id, symbol, CAST(date AS VARCHAR), close FROM stock_data \
             ORDER BY id ASC LIMIT ?",
            limit,
        )
    }

    /// Total number of cached observations.
    pub fn row_count(&self) -> Result<u64, WarehouseError> {
        let connection = self.manager.acquire()?;
        let count: i64 =
            connection.query_row("SELECT COUNT(*) FROM stock_data", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Names of the user tables in the database.
    pub fn list_tables(&self) -> Result<Vec<String>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let mut statement = connection.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )?;
        let names = statement
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

fn query_stored_rows(
    connection: &Connection,
    sql: &str,
    limit: usize,
) -> Result<Vec<StoredRow>, WarehouseError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut statement = connection.prepare(sql)?;
    let rows = statement
        .query_map([limit], |row| {
            Ok(StoredRow {
                id: row.get(0)?,
                symbol: row.get(1)?,
                date: row.get(2)?,
                close: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// Default database file under the stockdash home directory.
pub fn default_db_path() -> PathBuf {
    resolve_stockdash_home().join("cache").join("stocks.duckdb")
}

/// Resolve the stockdash home directory from environment or default.
fn resolve_stockdash_home() -> PathBuf {
    if let Some(path) = env::var_os("STOCKDASH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".stockdash");
    }

    PathBuf::from(".stockdash")
}
