//! # Stockdash Core
//!
//! Domain types, market-data access, and price analytics for the stockdash
//! service.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo chart API) |
//! | [`analytics`] | 52-week statistics and the linear trend forecast |
//! | [`companies`] | Static company directory |
//! | [`data_source`] | Provider trait and error types |
//! | [`domain`] | Domain models (Symbol, TradingDate, DailyBar, PriceObservation) |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP client abstraction |
//! | [`sample`] | Bundled sample series loader |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockdash_core::{predict_next_close, MarketDataSource, Symbol, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = YahooAdapter::default();
//!     let symbol = Symbol::parse("aapl")?;
//!
//!     let bars = adapter.fetch_recent_daily(&symbol).await?;
//!     let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
//!     println!("next close: {:?}", predict_next_close(&closes));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP handlers  │
//! └───┬─────────┬───┘
//!     │         │
//!     ▼         ▼
//! ┌────────┐  ┌─────────────────┐     ┌──────────────────┐
//! │ Cache  │  │ MarketDataSource│────▶│ HTTP Client      │
//! │(DuckDB)│  │ (Yahoo adapter) │     │ (reqwest)        │
//! └────────┘  └────────┬────────┘     └──────────────────┘
//!                      │
//!                      ▼
//!             ┌─────────────────┐
//!             │ Analytics       │
//!             │ (stats, OLS)    │
//!             └─────────────────┘
//! ```

pub mod adapters;
pub mod analytics;
pub mod companies;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod sample;

pub use adapters::{ChartRange, YahooAdapter};

pub use analytics::{
    fit_ols, predict_next_close, round2, AnnualStats, LinearFit, MIN_PREDICTION_POINTS,
};

pub use companies::COMPANIES;

pub use data_source::{MarketDataSource, ProviderError, ProviderErrorKind, ProviderFuture};

pub use domain::{CompanyDirectoryEntry, DailyBar, PriceObservation, Symbol, TradingDate};

pub use error::ValidationError;

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};

pub use sample::{
    bundled_sample_series, load_sample_series, read_sample_series, SampleDataError,
    BUNDLED_SAMPLE_CSV,
};

// Warehouse (re-exported from stockdash-warehouse)
pub use stockdash_warehouse::{
    PriceRecord, StoredRow, Warehouse, WarehouseConfig, WarehouseError,
};
