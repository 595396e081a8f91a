//! Yahoo Finance chart API provider

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::QuoteProvider;
use crate::clock::Clock;
use crate::config::QuoteConfig;
use crate::error::{Error, Result};
use crate::models::QuoteSnapshot;

/// Fetches the latest daily price from `/v8/finance/chart/{symbol}`
pub struct YahooQuoteProvider {
    client: Client,
    base_url: String,
    symbol: String,
    clock: Arc<dyn Clock>,
}

impl YahooQuoteProvider {
    /// Create a provider with a client bounded by `config.timeout`
    pub fn new(config: &QuoteConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::config(format!("Failed to create quote HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
            clock,
        })
    }

    fn chart_url(&self) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            self.symbol.replace('^', "%5E")
        )
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    async fn latest_quote(&self) -> Result<QuoteSnapshot> {
        let url = self.chart_url();
        debug!(url = %url, "Requesting chart data");

        let response = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::provider_unavailable(format!("Yahoo Finance API request timed out: {e}"))
                } else {
                    Error::provider_unavailable(format!("Yahoo Finance API request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::provider_unavailable(format!(
                "Yahoo Finance API error: {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::provider_unavailable(format!("Failed to read Yahoo Finance response: {e}"))
        })?;
        info!(bytes = body.len(), "Raw API response received");

        parse_chart(&body, self.clock.now())
    }
}

/// Extract `chart.result[0].meta.regularMarketPrice` from a chart payload
fn parse_chart(body: &str, fetched_at: DateTime<Utc>) -> Result<QuoteSnapshot> {
    let invalid = || {
        error!(payload = %body, "Invalid API response structure");
        Error::malformed("Invalid data structure from Yahoo Finance API")
    };

    let chart = match serde_json::from_str::<ChartResponse>(body) {
        Ok(chart) => chart.chart,
        Err(e) => {
            debug!(error = %e, "Chart payload did not deserialize");
            return Err(invalid());
        }
    };

    if let Some(err) = &chart.error {
        debug!(provider_error = %err, "Chart payload carried an error object");
    }

    let meta = chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.meta)
        .ok_or_else(invalid)?;

    let value = meta
        .regular_market_price
        .filter(|price| price.is_finite() && *price > 0.0)
        .ok_or_else(invalid)?;

    Ok(QuoteSnapshot {
        symbol: meta.symbol.unwrap_or_else(|| "^VIX".to_string()),
        value,
        currency: meta.currency,
        market_time: meta
            .regular_market_time
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        fetched_at,
    })
}

// Chart API payload types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ErrorKind;
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 5, 0, 3, 7).unwrap()
    }

    fn provider(server: &MockServer, timeout: Duration) -> YahooQuoteProvider {
        let config = QuoteConfig {
            base_url: server.uri(),
            timeout,
            ..QuoteConfig::default()
        };
        YahooQuoteProvider::new(&config, Arc::new(FixedClock(fetched_at()))).unwrap()
    }

    fn chart_body(price: serde_json::Value) -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "^VIX",
                        "currency": "USD",
                        "regularMarketPrice": price,
                        "regularMarketTime": 1722816000
                    }
                }],
                "error": null
            }
        })
    }

    #[tokio::test]
    async fn test_fetches_latest_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/%5EVIX"))
            .and(query_param("interval", "1d"))
            .and(query_param("range", "1d"))
            .and(header(
                "user-agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(json!(18.25))))
            .expect(1)
            .mount(&server)
            .await;

        let quote = provider(&server, Duration::from_secs(5))
            .latest_quote()
            .await
            .unwrap();

        assert_eq!(quote.value, 18.25);
        assert_eq!(quote.symbol, "^VIX");
        assert_eq!(quote.currency.as_deref(), Some("USD"));
        assert_eq!(quote.fetched_at, fetched_at());
        assert_eq!(
            quote.market_time,
            Some(Utc.with_ymd_and_hms(2024, 8, 5, 0, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(5))
            .latest_quote()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chart_body(json!(18.25)))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_millis(100))
            .latest_quote()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
    }

    #[tokio::test]
    async fn test_missing_price_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"chart": {"result": [{"meta": {"symbol": "^VIX"}}]}})),
            )
            .mount(&server)
            .await;

        let err = provider(&server, Duration::from_secs(5))
            .latest_quote()
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MalformedProviderResponse);
    }

    #[test]
    fn test_parse_rejects_unexpected_shapes() {
        for body in [
            "not json",
            r#"{"chart": {"result": null, "error": {"code": "Not Found"}}}"#,
            r#"{"chart": {"result": []}}"#,
            r#"{"chart": {"result": [{}]}}"#,
            r#"{"chart": {"result": [{"meta": {"regularMarketPrice": "18.2"}}]}}"#,
            r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 0}}]}}"#,
            r#"{"chart": {"result": [{"meta": {"regularMarketPrice": -5.0}}]}}"#,
            r#"{"quoteResponse": {}}"#,
        ] {
            let err = parse_chart(body, fetched_at()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedProviderResponse, "body: {body}");
        }
    }

    #[test]
    fn test_parse_keeps_exact_value() {
        let body = chart_body(json!(31.737)).to_string();
        let quote = parse_chart(&body, fetched_at()).unwrap();
        assert_eq!(quote.value, 31.737);
    }
}
