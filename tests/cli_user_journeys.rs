//! Behavior-driven tests for the stockdash binary's user journeys
//!
//! These tests cover what an operator does from the command line:
//! configuring the server and inspecting the cache afterwards.

use clap::Parser;
use serde_json::Value;
use stockdash_core::{PriceRecord, Warehouse, WarehouseConfig};
use stockdash_web::cli::{Cli, Command, InspectArgs};
use stockdash_web::inspect;
use tempfile::tempdir;

#[test]
fn operator_can_inspect_a_populated_cache() {
    // Given: A cache file with a few AAPL closes
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("cache").join("stocks.duckdb");
    {
        let warehouse = Warehouse::open(WarehouseConfig::new(&db_path)).expect("warehouse");
        warehouse
            .upsert_observations(
                "AAPL",
                &[
                    PriceRecord::new("2024-07-01", 216.75),
                    PriceRecord::new("2024-07-02", 220.27),
                    PriceRecord::new("2024-07-03", 221.55),
                ],
            )
            .expect("insert");
    }

    // When: They run `stockdash inspect --sample 2`
    let args = InspectArgs {
        db_path: Some(db_path.clone()),
        sample: 2,
    };
    let mut out = Vec::new();
    inspect::run(&args, &mut out).expect("inspect should succeed");

    // Then: The report shows the tables, the count, and the first rows
    let report: Value = serde_json::from_slice(&out).expect("json report");
    assert_eq!(report["row_count"], 3);
    assert!(report["tables"]
        .as_array()
        .expect("tables")
        .iter()
        .any(|table| table == "stock_data"));
    assert_eq!(report["sample"].as_array().map(Vec::len), Some(2));
    assert_eq!(report["sample"][0]["symbol"], "AAPL");
    assert_eq!(
        report["db_path"].as_str(),
        Some(db_path.display().to_string().as_str())
    );
}

#[test]
fn inspecting_a_fresh_path_creates_an_empty_cache() {
    let temp = tempdir().expect("tempdir");
    let args = InspectArgs {
        db_path: Some(temp.path().join("new").join("stocks.duckdb")),
        sample: 5,
    };

    let mut out = Vec::new();
    inspect::run(&args, &mut out).expect("inspect should succeed");

    let report: Value = serde_json::from_slice(&out).expect("json report");
    assert_eq!(report["row_count"], 0);
    assert_eq!(report["sample"].as_array().map(Vec::len), Some(0));
}

#[test]
fn operator_can_configure_the_server_from_flags() {
    let cli = Cli::try_parse_from([
        "stockdash",
        "serve",
        "--bind",
        "0.0.0.0:9000",
        "--sample-data",
        "data/sample_data.csv",
        "--timeout-ms",
        "2500",
        "--legacy-error-status",
    ])
    .expect("flags should parse");

    let Command::Serve(args) = cli.command else {
        panic!("expected the serve command");
    };
    assert_eq!(args.bind.port(), 9000);
    assert_eq!(args.timeout_ms, 2_500);
    assert!(args.legacy_error_status);
    assert_eq!(
        args.sample_data.as_deref(),
        Some(std::path::Path::new("data/sample_data.csv"))
    );
}

#[test]
fn operator_can_turn_off_the_sample_fallback() {
    let cli = Cli::try_parse_from(["stockdash", "serve", "--no-sample-data"])
        .expect("flags should parse");

    let Command::Serve(args) = cli.command else {
        panic!("expected the serve command");
    };
    assert!(args.no_sample_data);
    assert!(args.sample_data.is_none());
}
