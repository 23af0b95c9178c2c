//! Behavior-driven tests for the price cache
//!
//! These tests verify how the warehouse stores, deduplicates, and returns
//! cached closes when backed by a real DuckDB file.

use std::sync::Arc;
use std::thread;

use stockdash_warehouse::{PriceRecord, Warehouse, WarehouseConfig};
use tempfile::tempdir;

fn open_at(path: &std::path::Path) -> Warehouse {
    Warehouse::open(WarehouseConfig::new(path)).expect("warehouse open")
}

// =============================================================================
// Warehouse: Persistence
// =============================================================================

#[test]
fn when_warehouse_opens_in_a_missing_directory_it_creates_it() {
    // Given: A database path whose parent directories do not exist
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("cache").join("stocks.duckdb");

    // When: The warehouse is opened
    let warehouse = open_at(&path);

    // Then: The file exists and the schema is ready
    assert!(path.exists(), "database file should be created");
    assert_eq!(warehouse.db_path(), Some(path.as_path()));
    assert!(warehouse
        .list_tables()
        .expect("tables")
        .contains(&"stock_data".to_string()));
}

#[test]
fn when_user_reopens_the_cache_previous_closes_are_still_there() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("stocks.duckdb");

    {
        let warehouse = open_at(&path);
        warehouse
            .upsert_observations("AAPL", &[PriceRecord::new("2024-07-01", 216.75)])
            .expect("insert");
    }

    let reopened = open_at(&path);
    let rows = reopened.fetch_observations("AAPL").expect("fetch");
    assert_eq!(rows, vec![PriceRecord::new("2024-07-01", 216.75)]);
}

// =============================================================================
// Warehouse: Insert-if-absent
// =============================================================================

#[test]
fn when_the_same_window_is_saved_twice_only_new_days_are_added() {
    // Given: A cache holding two days
    let temp = tempdir().expect("tempdir");
    let warehouse = open_at(&temp.path().join("stocks.duckdb"));
    let first = [
        PriceRecord::new("2024-07-01", 216.75),
        PriceRecord::new("2024-07-02", 220.27),
    ];
    assert_eq!(warehouse.upsert_observations("AAPL", &first).expect("insert"), 2);

    // When: An overlapping window with a revised close is saved
    let second = [
        PriceRecord::new("2024-07-02", 999.0),
        PriceRecord::new("2024-07-03", 221.55),
    ];
    let inserted = warehouse.upsert_observations("AAPL", &second).expect("insert");

    // Then: Only the new day is inserted and the old close is kept
    assert_eq!(inserted, 1);
    let rows = warehouse.fetch_observations("AAPL").expect("fetch");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].close, 220.27);
}

#[test]
fn symbols_do_not_share_rows() {
    let temp = tempdir().expect("tempdir");
    let warehouse = open_at(&temp.path().join("stocks.duckdb"));
    let day = [PriceRecord::new("2024-07-01", 100.0)];

    warehouse.upsert_observations("AAPL", &day).expect("insert");
    warehouse.upsert_observations("MSFT", &day).expect("insert");

    assert_eq!(warehouse.row_count().expect("count"), 2);
    assert!(warehouse.fetch_observations("TSLA").expect("fetch").is_empty());
}

#[test]
fn concurrent_writers_never_duplicate_a_day() {
    // Given: Several threads saving the same window at once
    let temp = tempdir().expect("tempdir");
    let warehouse = Arc::new(open_at(&temp.path().join("stocks.duckdb")));
    let window: Vec<PriceRecord> = (1..=20)
        .map(|day| PriceRecord::new(format!("2024-07-{day:02}"), 100.0 + f64::from(day)))
        .collect();

    // When: All of them finish
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let warehouse = Arc::clone(&warehouse);
            let window = window.clone();
            thread::spawn(move || warehouse.upsert_observations("NVDA", &window))
        })
        .collect();
    let inserted: usize = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread").expect("insert"))
        .sum();

    // Then: Each day is stored exactly once
    assert_eq!(inserted, 20);
    assert_eq!(warehouse.row_count().expect("count"), 20);
}

// =============================================================================
// Warehouse: Inspection
// =============================================================================

#[test]
fn stored_rows_respect_the_limit_and_ordering() {
    let temp = tempdir().expect("tempdir");
    let warehouse = open_at(&temp.path().join("stocks.duckdb"));
    warehouse
        .upsert_observations(
            "TSLA",
            &[
                PriceRecord::new("2024-07-01", 209.86),
                PriceRecord::new("2024-07-02", 231.26),
            ],
        )
        .expect("insert");
    warehouse
        .upsert_observations("BABA", &[PriceRecord::new("2024-07-01", 72.10)])
        .expect("insert");

    let rows = warehouse.stored_rows(2).expect("stored rows");

    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].symbol.as_str(), rows[0].date.as_str()), ("BABA", "2024-07-01"));
    assert_eq!((rows[1].symbol.as_str(), rows[1].date.as_str()), ("TSLA", "2024-07-02"));

    let sample = warehouse.sample_rows(10).expect("sample rows");
    assert_eq!(sample.first().map(|row| row.symbol.as_str()), Some("TSLA"));
}
