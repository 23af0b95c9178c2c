//! Summary statistics and the linear trend forecast.
//!
//! The forecast is an ordinary least squares fit of close on a zero-based
//! day index, evaluated one step past the last observation. It is a
//! dashboard hint, not a model: nothing is validated or cross-checked.

use serde::Serialize;

use crate::DailyBar;

/// Minimum number of closes needed before a forecast is produced.
pub const MIN_PREDICTION_POINTS: usize = 3;

/// Round to two decimals, ties to even.
///
/// A close like `2.675` is stored as `2.67499...` and rounds down; exact
/// binary halves such as `0.125` go to the even cent.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `close = intercept + slope * index` fitted by least squares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn evaluate(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

/// Fit closes (oldest first) against their positional index.
///
/// Returns `None` for fewer than two points, where no line is determined.
pub fn fit_ols(closes: &[f64]) -> Option<LinearFit> {
    if closes.len() < 2 {
        return None;
    }

    let n = closes.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = closes.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &close) in closes.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (close - y_mean);
        den += dx * dx;
    }

    let slope = num / den;
    Some(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Next-day close predicted from the trend of `closes`, rounded to cents.
pub fn predict_next_close(closes: &[f64]) -> Option<f64> {
    if closes.len() < MIN_PREDICTION_POINTS {
        return None;
    }
    let fit = fit_ols(closes)?;
    let predicted = fit.evaluate(closes.len() as f64);
    predicted.is_finite().then(|| round2(predicted))
}

/// 52-week statistics derived from a year of daily bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnnualStats {
    pub high_52w: Option<f64>,
    pub low_52w: Option<f64>,
    pub avg_volume: Option<u64>,
}

impl AnnualStats {
    /// Every field null; used when the annual fetch failed.
    pub const fn unavailable() -> Self {
        Self {
            high_52w: None,
            low_52w: None,
            avg_volume: None,
        }
    }

    pub fn from_bars(bars: &[DailyBar]) -> Self {
        if bars.is_empty() {
            return Self::unavailable();
        }

        let high = bars.iter().map(|bar| bar.close).fold(f64::MIN, f64::max);
        let low = bars.iter().map(|bar| bar.close).fold(f64::MAX, f64::min);

        let volumes: Vec<u64> = bars.iter().filter_map(|bar| bar.volume).collect();
        let avg_volume = if volumes.is_empty() {
            None
        } else {
            let total: u128 = volumes.iter().map(|&v| u128::from(v)).sum();
            u64::try_from(total / volumes.len() as u128).ok()
        };

        Self {
            high_52w: Some(round2(high)),
            low_52w: Some(round2(low)),
            avg_volume,
        }
    }
}
