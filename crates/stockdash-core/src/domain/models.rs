use serde::{Deserialize, Serialize};
use stockdash_warehouse::PriceRecord;

use crate::{Symbol, TradingDate, ValidationError};

/// One cached closing price for a symbol on a trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub symbol: Symbol,
    pub date: TradingDate,
    pub close: f64,
}

impl PriceObservation {
    pub fn new(symbol: Symbol, date: TradingDate, close: f64) -> Result<Self, ValidationError> {
        validate_positive("close", close)?;
        Ok(Self {
            symbol,
            date,
            close,
        })
    }

    /// Rebuild an observation from a cache row.
    pub fn from_record(symbol: &Symbol, record: &PriceRecord) -> Result<Self, ValidationError> {
        Self::new(symbol.clone(), TradingDate::parse(&record.date)?, record.close)
    }

    pub fn to_record(&self) -> PriceRecord {
        PriceRecord::new(self.date.format_iso(), self.close)
    }
}

/// Daily bar as returned by a market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradingDate,
    pub close: f64,
    pub volume: Option<u64>,
}

impl DailyBar {
    pub fn new(date: TradingDate, close: f64, volume: Option<u64>) -> Result<Self, ValidationError> {
        validate_positive("close", close)?;
        Ok(Self {
            date,
            close,
            volume,
        })
    }

    pub fn into_observation(self, symbol: &Symbol) -> PriceObservation {
        PriceObservation {
            symbol: symbol.clone(),
            date: self.date,
            close: self.close,
        }
    }
}

/// Static entry of the company directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompanyDirectoryEntry {
    pub symbol: &'static str,
    pub name: &'static str,
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").expect("symbol")
    }

    #[test]
    fn rejects_non_positive_and_nan_closes() {
        let date = TradingDate::parse("2024-01-02").expect("date");
        assert!(matches!(
            PriceObservation::new(aapl(), date, 0.0),
            Err(ValidationError::NonPositiveValue { field: "close" })
        ));
        assert!(matches!(
            DailyBar::new(date, f64::NAN, None),
            Err(ValidationError::NonFiniteValue { field: "close" })
        ));
    }

    #[test]
    fn converts_to_and_from_cache_records() {
        let record = PriceRecord::new("2024-01-02", 185.64);
        let observation = PriceObservation::from_record(&aapl(), &record).expect("valid record");

        assert_eq!(observation.date.to_string(), "2024-01-02");
        assert_eq!(observation.to_record(), record);
    }
}
