//! Market-data provider adapters.

mod yahoo;

pub use yahoo::{ChartRange, YahooAdapter};
