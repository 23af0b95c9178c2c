//! Request composition: read-through cache, provider fallback, statistics.

use std::path::PathBuf;

use serde::Serialize;
use stockdash_core::{
    bundled_sample_series, load_sample_series, predict_next_close, round2, AnnualStats, DailyBar,
    PriceObservation, PriceRecord, ProviderError, ProviderErrorKind, Symbol, TradingDate,
};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{AppState, SampleSource};

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub date: TradingDate,
    pub close: f64,
}

/// Response body of `GET /stock/{symbol}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub symbol: Symbol,
    pub data: Vec<PricePoint>,
    pub predicted_price: Option<f64>,
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
    pub avg_volume: Option<u64>,
}

impl StockSummary {
    fn assemble(symbol: Symbol, series: &[PriceObservation], annual: AnnualStats) -> Self {
        let closes: Vec<f64> = series.iter().map(|observation| observation.close).collect();

        Self {
            symbol,
            data: series
                .iter()
                .map(|observation| PricePoint {
                    date: observation.date,
                    close: round2(observation.close),
                })
                .collect(),
            predicted_price: predict_next_close(&closes),
            high_52w: annual.high_52w,
            low_52w: annual.low_52w,
            avg_volume: annual.avg_volume,
        }
    }
}

/// Build the dashboard summary for `symbol`.
pub async fn stock_summary(state: &AppState, symbol: Symbol) -> Result<StockSummary, ApiError> {
    let series = resolve_series(state, &symbol).await?;

    let annual = match state.provider.fetch_annual_summary(&symbol).await {
        Ok(bars) => AnnualStats::from_bars(&bars),
        Err(error) => {
            warn!(%symbol, %error, "annual summary unavailable, statistics will be null");
            AnnualStats::unavailable()
        }
    };

    Ok(StockSummary::assemble(symbol, &series, annual))
}

/// Pull the recent window from the provider and cache it.
///
/// Returns the number of rows that were not cached before.
pub async fn refresh(state: &AppState, symbol: &Symbol) -> Result<usize, ApiError> {
    let bars = state
        .provider
        .fetch_recent_daily(symbol)
        .await
        .map_err(|error| provider_failure(symbol, error))?;
    if bars.is_empty() {
        return Err(ApiError::no_fresh_data(symbol));
    }

    let observations = to_observations(symbol, bars);
    let inserted = persist(state, symbol, &observations).await?;
    info!(%symbol, fetched = observations.len(), inserted, "refreshed cache");
    Ok(inserted)
}

/// Cached series, else provider series (cached on the way), else the
/// bundled sample.
async fn resolve_series(
    state: &AppState,
    symbol: &Symbol,
) -> Result<Vec<PriceObservation>, ApiError> {
    let cached = load_cached(state, symbol).await?;
    if !cached.is_empty() {
        debug!(%symbol, rows = cached.len(), "serving cached series");
        return Ok(cached);
    }

    let failure = match state.provider.fetch_recent_daily(symbol).await {
        Ok(bars) if !bars.is_empty() => {
            let observations = to_observations(symbol, bars);
            if let Err(error) = persist(state, symbol, &observations).await {
                warn!(%symbol, %error, "could not cache provider series");
            }
            return Ok(observations);
        }
        Ok(_) => ApiError::no_data(symbol),
        Err(error) => provider_failure(symbol, error),
    };

    match load_sample(state, symbol).await? {
        Some(sample) => {
            warn!(%symbol, reason = %failure, "serving bundled sample series");
            Ok(sample)
        }
        None => Err(failure),
    }
}

async fn load_cached(
    state: &AppState,
    symbol: &Symbol,
) -> Result<Vec<PriceObservation>, ApiError> {
    let warehouse = state.warehouse.clone();
    let key = symbol.to_string();
    let records = tokio::task::spawn_blocking(move || warehouse.fetch_observations(&key)).await??;

    records
        .iter()
        .map(|record| {
            PriceObservation::from_record(symbol, record).map_err(|error| {
                ApiError::Internal(format!("corrupt cache row for {symbol}: {error}"))
            })
        })
        .collect()
}

async fn persist(
    state: &AppState,
    symbol: &Symbol,
    observations: &[PriceObservation],
) -> Result<usize, ApiError> {
    let warehouse = state.warehouse.clone();
    let key = symbol.to_string();
    let records: Vec<PriceRecord> = observations
        .iter()
        .map(PriceObservation::to_record)
        .collect();

    let inserted =
        tokio::task::spawn_blocking(move || warehouse.upsert_observations(&key, &records))
            .await??;
    Ok(inserted)
}

async fn load_sample(
    state: &AppState,
    symbol: &Symbol,
) -> Result<Option<Vec<PriceObservation>>, ApiError> {
    let bars = match &state.sample_data {
        SampleSource::Disabled => return Ok(None),
        SampleSource::Bundled => bundled_sample_series()?,
        SampleSource::File(path) => {
            if !path.is_file() {
                debug!(path = %path.display(), "sample data file not found");
                return Ok(None);
            }
            let path = path.clone();
            tokio::task::spawn_blocking(move || read_sample(path)).await??
        }
    };

    if bars.is_empty() {
        return Ok(None);
    }
    Ok(Some(to_observations(symbol, bars)))
}

fn read_sample(path: PathBuf) -> Result<Vec<DailyBar>, ApiError> {
    Ok(load_sample_series(path)?)
}

fn to_observations(symbol: &Symbol, bars: Vec<DailyBar>) -> Vec<PriceObservation> {
    bars.into_iter()
        .map(|bar| bar.into_observation(symbol))
        .collect()
}

fn provider_failure(symbol: &Symbol, error: ProviderError) -> ApiError {
    match error.kind() {
        ProviderErrorKind::NoData => {
            debug!(%symbol, %error, "provider has no data");
            ApiError::no_data(symbol)
        }
        ProviderErrorKind::Unavailable | ProviderErrorKind::InvalidResponse => {
            warn!(%symbol, %error, "provider call failed");
            ApiError::ProviderUnavailable {
                symbol: symbol.to_string(),
                source: error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(day: &str, close: f64) -> PriceObservation {
        PriceObservation::new(
            Symbol::parse("AAPL").expect("symbol"),
            TradingDate::parse(day).expect("date"),
            close,
        )
        .expect("observation")
    }

    #[test]
    fn summary_rounds_points_but_predicts_from_raw_closes() {
        let series = [
            observation("2024-07-01", 100.004),
            observation("2024-07-02", 102.004),
            observation("2024-07-03", 104.004),
        ];

        let summary = StockSummary::assemble(
            Symbol::parse("AAPL").expect("symbol"),
            &series,
            AnnualStats::unavailable(),
        );

        assert_eq!(summary.data[0].close, 100.0);
        assert_eq!(summary.predicted_price, Some(106.0));
        assert_eq!(summary.high_52w, None);
    }

    #[test]
    fn unavailable_fields_serialize_as_null() {
        let summary = StockSummary::assemble(
            Symbol::parse("AAPL").expect("symbol"),
            &[observation("2024-07-01", 10.0)],
            AnnualStats::unavailable(),
        );

        let body = serde_json::to_value(&summary).expect("serialize");

        assert_eq!(body["symbol"], "AAPL");
        assert_eq!(body["data"][0]["date"], "2024-07-01");
        assert!(body["predicted_price"].is_null());
        assert!(body["avg_volume"].is_null());
    }
}
