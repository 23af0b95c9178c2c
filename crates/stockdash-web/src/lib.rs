//! # Stockdash Web
//!
//! HTTP API for the stock dashboard.
//!
//! ## Endpoints
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | `{"message": "Stock Dashboard API running"}` |
//! | `GET /companies` | `[{symbol, name}]`, always the ten directory entries |
//! | `GET /stock/{symbol}` | `{symbol, data, predicted_price, high_52w, low_52w, avg_volume}` |
//! | `GET /refresh/{symbol}` | `{status: "ok", message}` |
//! | `GET /stored?limit=200` | `[{id, symbol, date, close}]` |
//!
//! Failures answer `{"error": "..."}` with a status from [`ApiError::status`],
//! or 200 when [`AppState::legacy_error_status`] is set.

pub mod api;
pub mod cli;
pub mod error;
pub mod inspect;
pub mod server;
pub mod service;
pub mod state;

pub use error::{ApiError, CliError};
pub use server::{build_router, init_tracing, serve};
pub use service::{PricePoint, StockSummary};
pub use state::{AppState, SampleSource};
