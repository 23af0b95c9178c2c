//! CLI argument definitions for stockdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP API |
//! | `inspect` | Print tables, row count, and sample rows of the cache |
//!
//! # Environment
//!
//! | Variable | Option |
//! |----------|--------|
//! | `STOCKDASH_BIND` | `serve --bind` |
//! | `STOCKDASH_DB_PATH` | `--db-path` |
//! | `STOCKDASH_SAMPLE_DATA` | `serve --sample-data` |
//! | `STOCKDASH_TIMEOUT_MS` | `serve --timeout-ms` |
//! | `STOCKDASH_HOME` | base directory of the default database path |
//!
//! # Examples
//!
//! ```bash
//! stockdash serve --bind 0.0.0.0:8000
//! stockdash serve --sample-data my_sample.csv
//! stockdash serve --no-sample-data
//! stockdash inspect --sample 10
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockdash_core::DEFAULT_TIMEOUT_MS;

/// Stock dashboard backend: cached daily closes, 52-week stats, and a
/// naive next-day forecast.
#[derive(Debug, Parser)]
#[command(name = "stockdash", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Summarize the contents of the price cache.
    Inspect(InspectArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "STOCKDASH_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// DuckDB file backing the cache.
    #[arg(long, env = "STOCKDASH_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// CSV with `Date` and `Close` columns served when the provider fails.
    /// Defaults to the sample compiled into the binary.
    #[arg(long, env = "STOCKDASH_SAMPLE_DATA")]
    pub sample_data: Option<PathBuf>,

    /// Answer provider failures with an error instead of sample data.
    #[arg(long, conflicts_with = "sample_data")]
    pub no_sample_data: bool,

    /// Per-request provider timeout in milliseconds.
    #[arg(long, env = "STOCKDASH_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Answer errors with HTTP 200 and an `{"error": ...}` body.
    #[arg(long)]
    pub legacy_error_status: bool,
}

#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// DuckDB file backing the cache.
    #[arg(long, env = "STOCKDASH_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Number of sample rows to print.
    #[arg(long, default_value_t = 5)]
    pub sample: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["stockdash", "serve"]).expect("parse");
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!args.legacy_error_status);
        assert!(!args.no_sample_data);
    }

    #[test]
    fn inspect_accepts_sample_count() {
        let cli = Cli::try_parse_from(["stockdash", "inspect", "--db-path", "x.duckdb", "--sample", "3"])
            .expect("parse");
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.sample, 3);
        assert_eq!(args.db_path, Some(PathBuf::from("x.duckdb")));
    }

    #[test]
    fn sample_override_and_opt_out_are_exclusive() {
        assert!(Cli::try_parse_from([
            "stockdash",
            "serve",
            "--sample-data",
            "x.csv",
            "--no-sample-data",
        ])
        .is_err());
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        assert!(Cli::try_parse_from(["stockdash", "serve", "--bind", "nowhere"]).is_err());
    }
}
