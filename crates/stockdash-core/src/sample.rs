//! Bundled sample series used when the provider has nothing to offer.
//!
//! The file is a plain CSV with a `Date` and a `Close` column; a `Volume`
//! column is read when present. Rows with an empty close are skipped.
//! A copy of `data/sample_data.csv` is compiled into the crate and used
//! unless another file is configured.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::{DailyBar, TradingDate, ValidationError};

#[derive(Debug, Error)]
pub enum SampleDataError {
    #[error("failed to read sample data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid sample row at line {line}: {source}")]
    InvalidRow {
        line: u64,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<u64>,
}

/// The sample dataset shipped with stockdash.
pub const BUNDLED_SAMPLE_CSV: &str = include_str!("../../../data/sample_data.csv");

/// Parse [`BUNDLED_SAMPLE_CSV`].
pub fn bundled_sample_series() -> Result<Vec<DailyBar>, SampleDataError> {
    read_sample_series(BUNDLED_SAMPLE_CSV.as_bytes())
}

/// Load the sample series at `path`, oldest first.
pub fn load_sample_series(path: impl AsRef<Path>) -> Result<Vec<DailyBar>, SampleDataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    collect_rows(reader)
}

/// Same as [`load_sample_series`] over any reader.
pub fn read_sample_series<R: Read>(input: R) -> Result<Vec<DailyBar>, SampleDataError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    collect_rows(reader)
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<DailyBar>, SampleDataError> {
    let headers = reader.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut bars = Vec::new();

    while reader.read_record(&mut record)? {
        let row: SampleRow = record.deserialize(Some(&headers))?;
        let Some(close) = row.close else {
            continue;
        };
        let line = record.position().map_or(0, |position| position.line());

        let bar = TradingDate::parse(&row.date)
            .and_then(|date| DailyBar::new(date, close, row.volume))
            .map_err(|source| SampleDataError::InvalidRow { line, source })?;
        bars.push(bar);
    }

    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    Ok(bars)
}
