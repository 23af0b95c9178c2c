//! Contract tests for market-data providers
//!
//! Every provider is consumed through `MarketDataSource`; these tests pin
//! down what callers may rely on regardless of the implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use stockdash_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketDataSource, ProviderError,
    ProviderErrorKind, Symbol, YahooAdapter,
};

/// Replays one canned response per call, oldest first.
struct ScriptedHttpClient {
    responses: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
            urls: Mutex::new(Vec::new()),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.urls.lock().expect("lock").push(request.url);
        let response = self
            .responses
            .lock()
            .expect("lock")
            .pop()
            .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
        Box::pin(async move { response })
    }
}

fn chart(timestamps: &[i64], closes: &[Option<f64>], volumes: &[Option<u64>]) -> String {
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "gmtoffset": -14400},
                "timestamp": timestamps,
                "indicators": {"quote": [{"close": closes, "volume": volumes}]}
            }],
            "error": null
        }
    })
    .to_string()
}

fn aapl() -> Symbol {
    Symbol::parse("AAPL").expect("valid symbol")
}

#[tokio::test]
async fn recent_and_annual_windows_hit_distinct_ranges() {
    let body = chart(&[1_719_840_600], &[Some(216.75)], &[Some(60_402_900)]);
    let client = Arc::new(ScriptedHttpClient::new(vec![
        Ok(HttpResponse::ok_json(body.clone())),
        Ok(HttpResponse::ok_json(body)),
    ]));
    let provider: Arc<dyn MarketDataSource> =
        Arc::new(YahooAdapter::with_http_client(client.clone()));

    provider.fetch_recent_daily(&aapl()).await.expect("recent");
    provider.fetch_annual_summary(&aapl()).await.expect("annual");

    let urls = client.urls();
    assert!(urls[0].contains("range=1mo&interval=1d"));
    assert!(urls[1].contains("range=1y&interval=1d"));
    assert_eq!(provider.name(), "yahoo");
}

#[tokio::test]
async fn bars_come_back_oldest_first_with_positive_closes() {
    let body = chart(
        &[1_719_840_600, 1_719_927_000, 1_720_013_400, 1_720_186_200],
        &[Some(216.75), Some(-1.0), Some(221.55), None],
        &[Some(60_402_900), Some(1), None, Some(5)],
    );
    let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(body))]));
    let provider = YahooAdapter::with_http_client(client);

    let bars = provider.fetch_annual_summary(&aapl()).await.expect("annual");

    assert_eq!(bars.len(), 2);
    assert!(bars.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert!(bars.iter().all(|bar| bar.close > 0.0));
    assert_eq!(bars[1].volume, None);
}

#[tokio::test]
async fn every_failure_is_a_classified_provider_error() {
    let client = Arc::new(ScriptedHttpClient::new(vec![
        Err(HttpError::new("request timeout: deadline elapsed")),
        Ok(HttpResponse::new(503, "Service Unavailable")),
        Ok(HttpResponse::ok_json("{\"chart\": 42}")),
        Ok(HttpResponse::new(
            404,
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#,
        )),
    ]));
    let provider = YahooAdapter::with_http_client(client);

    let mut kinds = Vec::new();
    for _ in 0..4 {
        let error: ProviderError = provider
            .fetch_recent_daily(&aapl())
            .await
            .expect_err("scripted failure");
        kinds.push(error.kind());
    }

    assert_eq!(
        kinds,
        [
            ProviderErrorKind::Unavailable,
            ProviderErrorKind::Unavailable,
            ProviderErrorKind::InvalidResponse,
            ProviderErrorKind::NoData,
        ]
    );
}

#[test]
fn provider_error_codes_are_stable() {
    assert_eq!(ProviderError::unavailable("x").code(), "provider.unavailable");
    assert_eq!(ProviderError::no_data("x").code(), "provider.no_data");
    assert_eq!(
        ProviderError::invalid_response("x").code(),
        "provider.invalid_response"
    );
}
