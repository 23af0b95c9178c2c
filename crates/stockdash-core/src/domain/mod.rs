//! # Domain Models
//!
//! Canonical domain types for stockdash.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercased ticker |
//! | [`TradingDate`] | Calendar day serialized as `YYYY-MM-DD` |
//! | [`PriceObservation`] | Cached close for a symbol and day |
//! | [`DailyBar`] | Provider daily close with optional volume |
//! | [`CompanyDirectoryEntry`] | Static symbol/name pair |
//!
//! All constructors validate their invariants: symbols are non-empty ASCII
//! tickers and closes are finite and strictly positive.

mod date;
mod models;
mod symbol;

pub use date::TradingDate;
pub use models::{CompanyDirectoryEntry, DailyBar, PriceObservation};
pub use symbol::Symbol;
