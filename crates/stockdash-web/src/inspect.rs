use std::io::Write;

use serde::Serialize;
use stockdash_core::{StoredRow, Warehouse, WarehouseConfig};

use crate::cli::InspectArgs;
use crate::error::CliError;

/// Snapshot of the cache printed by `stockdash inspect`.
#[derive(Debug, Serialize)]
pub struct CacheReport {
    pub db_path: Option<String>,
    pub tables: Vec<String>,
    pub row_count: u64,
    pub sample: Vec<StoredRow>,
}

impl CacheReport {
    pub fn collect(warehouse: &Warehouse, sample: usize) -> Result<Self, CliError> {
        Ok(Self {
            db_path: warehouse.db_path().map(|path| path.display().to_string()),
            tables: warehouse.list_tables()?,
            row_count: warehouse.row_count()?,
            sample: warehouse.sample_rows(sample)?,
        })
    }
}

pub fn run(args: &InspectArgs, out: &mut impl Write) -> Result<(), CliError> {
    let config = args
        .db_path
        .clone()
        .map(WarehouseConfig::new)
        .unwrap_or_default();
    let warehouse = Warehouse::open(config)?;

    let report = CacheReport::collect(&warehouse, args.sample)?;
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}
