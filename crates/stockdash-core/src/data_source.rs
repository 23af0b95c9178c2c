//! Market-data provider contract.
//!
//! Handlers never treat a [`ProviderError`] as fatal: a failed recent fetch
//! falls back to the bundled sample series, and a failed annual fetch turns
//! the 52-week statistics into nulls.
//!
//! | Operation | Window | Used for |
//! |-----------|--------|----------|
//! | [`fetch_recent_daily`](MarketDataSource::fetch_recent_daily) | 1 month | chart series, cache fill, refresh |
//! | [`fetch_annual_summary`](MarketDataSource::fetch_annual_summary) | 1 year | 52-week high/low, average volume |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DailyBar, Symbol};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Network failure, timeout, or non-success upstream status.
    Unavailable,
    /// The provider answered but knows nothing about the symbol.
    NoData,
    /// The provider answered with a payload we could not interpret.
    InvalidResponse,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::NoData,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::NoData => "provider.no_data",
            ProviderErrorKind::InvalidResponse => "provider.invalid_response",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// Boxed future returned by provider calls.
pub type ProviderFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<DailyBar>, ProviderError>> + Send + 'a>>;

/// Source of daily price history.
///
/// Implementations make a single attempt per call; there is no retry.
/// Bars are returned oldest first.
pub trait MarketDataSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Up to one month of daily closes.
    fn fetch_recent_daily<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a>;

    /// Up to one year of daily closes and volumes.
    fn fetch_annual_summary<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let error = ProviderError::unavailable("connection refused");
        assert_eq!(error.to_string(), "connection refused (provider.unavailable)");
        assert_eq!(error.kind(), ProviderErrorKind::Unavailable);
    }
}
