use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{MarketDataSource, ProviderError, ProviderFuture};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{DailyBar, Symbol, TradingDate};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
// Yahoo answers 429 to most non-browser user agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// History window requested from the chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    OneMonth,
    OneYear,
}

impl ChartRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::OneYear => "1y",
        }
    }
}

/// Yahoo Finance adapter backed by the public v8 chart endpoint.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, symbol: &Symbol, range: ChartRange) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            range.as_str()
        )
    }

    async fn fetch_chart(
        &self,
        symbol: &Symbol,
        range: ChartRange,
    ) -> Result<Vec<DailyBar>, ProviderError> {
        let request = HttpRequest::get(self.chart_url(symbol, range))
            .with_header("user-agent", BROWSER_USER_AGENT)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            ProviderError::unavailable(format!("yahoo transport error: {}", e.message()))
        })?;

        if response.status == 404 {
            return Err(ProviderError::no_data(not_found_message(symbol, &response.body)));
        }
        if !response.is_success() {
            return Err(ProviderError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        parse_chart(symbol, &response.body)
    }
}

impl MarketDataSource for YahooAdapter {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch_recent_daily<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a> {
        Box::pin(self.fetch_chart(symbol, ChartRange::OneMonth))
    }

    fn fetch_annual_summary<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a> {
        Box::pin(self.fetch_chart(symbol, ChartRange::OneYear))
    }
}

/// Normalize a chart payload into daily bars, oldest first.
///
/// Rows without a close (halted days) and rows failing validation are
/// dropped. When Yahoo appends a live bar sharing the previous row's date,
/// the later row wins.
fn parse_chart(symbol: &Symbol, body: &str) -> Result<Vec<DailyBar>, ProviderError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse yahoo chart: {e}"))
    })?;

    if let Some(error) = chart_response.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("not found") {
            ProviderError::no_data(error.describe())
        } else {
            ProviderError::unavailable(format!("yahoo chart API error: {}", error.describe()))
        });
    }

    let result = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::no_data(format!("no chart data for {symbol}")))?;

    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let gmt_offset = result.meta.and_then(|meta| meta.gmtoffset).unwrap_or(0);
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::invalid_response("chart response has no quote block"))?;

    let mut bars: Vec<DailyBar> = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .and_then(|v| u64::try_from(v).ok());
        let Ok(date) = TradingDate::from_unix_timestamp(ts, gmt_offset) else {
            continue;
        };
        let Ok(bar) = DailyBar::new(date, close, volume) else {
            continue;
        };

        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => bars.push(bar),
        }
    }

    Ok(bars)
}

fn not_found_message(symbol: &Symbol, body: &str) -> String {
    serde_json::from_str::<YahooChartResponse>(body)
        .ok()
        .and_then(|response| response.chart.error)
        .map(|error| error.describe())
        .unwrap_or_else(|| format!("yahoo has no chart for {symbol}"))
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl YahooChartError {
    fn describe(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", self.code, description)
            }
            _ => self.code.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Option<YahooChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(default)]
    gmtoffset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
