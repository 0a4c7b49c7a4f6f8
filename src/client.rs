use std::time::Duration;

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::model::{Period, PricePoint, PriceSeries, TickerMetadata};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "price,summaryDetail,financialData,assetProfile";

// Yahoo rejects clients without a browser-looking user agent.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("provider error: {0}")]
    Provider(String),
}

/// Thin read-only client for Yahoo Finance's unofficial endpoints.
/// One attempt per call; retry policy is the caller starting a new
/// request cycle.
pub struct YahooClient {
    http: reqwest::blocking::Client,
}

impl YahooClient {
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Daily close history for the requested period. An Ok empty series
    /// means the provider had nothing for the ticker.
    pub fn fetch_history(&self, ticker: &str, period: Period) -> Result<PriceSeries, FetchError> {
        let url = format!(
            "{CHART_URL}/{}?range={}&interval=1d",
            urlencoding::encode(ticker),
            period.api_token()
        );
        let body = self.get_text(&url)?;
        parse_history(ticker, &body)
    }

    /// Descriptive metadata bundle. Callers treat any error here as a
    /// degraded-but-renderable state, not a failure of the cycle.
    pub fn fetch_metadata(&self, ticker: &str) -> Result<TickerMetadata, FetchError> {
        let url = format!(
            "{QUOTE_SUMMARY_URL}/{}?modules={QUOTE_SUMMARY_MODULES}",
            urlencoding::encode(ticker)
        );
        let body = self.get_text(&url)?;
        parse_metadata(&body)
    }

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "GET");
        let response = self.http.get(url).send()?;
        let status = response.status();
        debug!(status = status.as_u16(), "response");
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

fn parse_history(ticker: &str, body: &str) -> Result<PriceSeries, FetchError> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        return Err(FetchError::Provider(error.describe()));
    }

    let mut points = Vec::new();
    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next();

    if let Some(result) = result {
        if let Some(quote) = result.indicators.quote.first() {
            for (i, &ts) in result.timestamp.iter().enumerate() {
                // Closes can be null for halted or partial sessions.
                let Some(close) = quote.close.get(i).copied().flatten() else {
                    continue;
                };
                let Some(ts) = DateTime::from_timestamp(ts, 0) else {
                    continue;
                };
                points.push(PricePoint { ts, close });
            }
        }
    }

    points.sort_by_key(|p| p.ts);
    points.dedup_by_key(|p| p.ts);

    Ok(PriceSeries {
        ticker: ticker.to_owned(),
        points,
    })
}

fn parse_metadata(body: &str) -> Result<TickerMetadata, FetchError> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)?;

    if let Some(error) = response.quote_summary.error {
        return Err(FetchError::Provider(error.describe()));
    }

    let result = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .unwrap_or_default();

    let price = result.price;
    let detail = result.summary_detail;
    let financial = result.financial_data;
    let profile = result.asset_profile;

    Ok(TickerMetadata {
        short_name: price.as_ref().and_then(|p| p.short_name.clone()),
        current_price: financial
            .as_ref()
            .and_then(|f| f.current_price.as_ref())
            .and_then(RawValue::to_option),
        previous_close: detail
            .as_ref()
            .and_then(|d| d.previous_close.as_ref())
            .and_then(RawValue::to_option),
        currency: price.as_ref().and_then(|p| p.currency.clone()),
        market_cap: price
            .as_ref()
            .and_then(|p| p.market_cap.as_ref())
            .and_then(RawValue::to_option),
        trailing_pe: detail
            .as_ref()
            .and_then(|d| d.trailing_pe.as_ref())
            .and_then(RawValue::to_option),
        dividend_yield: detail
            .as_ref()
            .and_then(|d| d.dividend_yield.as_ref())
            .and_then(RawValue::to_option),
        fifty_two_week_high: detail
            .as_ref()
            .and_then(|d| d.fifty_two_week_high.as_ref())
            .and_then(RawValue::to_option),
        fifty_two_week_low: detail
            .as_ref()
            .and_then(|d| d.fifty_two_week_low.as_ref())
            .and_then(RawValue::to_option),
        volume: detail
            .as_ref()
            .and_then(|d| d.volume.as_ref())
            .and_then(RawValue::to_option),
        long_business_summary: profile.and_then(|p| p.long_business_summary),
    })
}

// Chart (v8) response structures.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

// quoteSummary (v10) response structures.

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfileModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "previousClose", default)]
    previous_close: Option<RawValue>,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekHigh", default)]
    fifty_two_week_high: Option<RawValue>,
    #[serde(rename = "fiftyTwoWeekLow", default)]
    fifty_two_week_low: Option<RawValue>,
    #[serde(default)]
    volume: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "currentPrice", default)]
    current_price: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct AssetProfileModule {
    #[serde(rename = "longBusinessSummary", default)]
    long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unspecified provider error".to_owned())
    }
}

/// Yahoo wraps numeric fields in an object carrying the raw value plus
/// preformatted variants; only the raw number matters here. A NaN or
/// zero raw counts as absent.
#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

impl RawValue {
    fn to_option(&self) -> Option<f64> {
        self.raw.filter(|v| v.is_finite() && *v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chart_payload_and_skips_null_closes() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL"},
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {"quote": [{"close": [185.64, null, 184.25]}]}
                }],
                "error": null
            }
        }"#;

        let series = parse_history("AAPL", body).expect("payload parses");
        assert_eq!(series.ticker, "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].close, 185.64);
        assert_eq!(series.points[1].close, 184.25);
        assert!(series.points[0].ts < series.points[1].ts);
    }

    #[test]
    fn duplicate_timestamps_collapse_to_one_point() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704153600, 1704067200, 1704153600],
                    "indicators": {"quote": [{"close": [186.0, 185.0, 186.5]}]}
                }]
            }
        }"#;

        let series = parse_history("AAPL", body).expect("payload parses");
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].close, 185.0);
    }

    #[test]
    fn chart_error_surfaces_as_provider_error() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let error = parse_history("NOPE", body).expect_err("provider error");
        assert!(matches!(error, FetchError::Provider(_)));
        assert!(error.to_string().contains("No data found"));
    }

    #[test]
    fn missing_result_is_an_empty_series_not_an_error() {
        let body = r#"{"chart": {"result": [], "error": null}}"#;
        let series = parse_history("XYZ", body).expect("payload parses");
        assert!(series.is_empty());
    }

    #[test]
    fn parses_quote_summary_modules() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "shortName": "Apple Inc.",
                        "currency": "USD",
                        "marketCap": {"raw": 2.85e12, "fmt": "2.85T"}
                    },
                    "summaryDetail": {
                        "previousClose": {"raw": 185.64},
                        "trailingPE": {"raw": 29.8},
                        "dividendYield": {"raw": 0.0052},
                        "fiftyTwoWeekHigh": {"raw": 199.62},
                        "fiftyTwoWeekLow": {"raw": 164.08},
                        "volume": {"raw": 52164500}
                    },
                    "financialData": {"currentPrice": {"raw": 184.25}},
                    "assetProfile": {"longBusinessSummary": "Apple designs consumer electronics."}
                }],
                "error": null
            }
        }"#;

        let meta = parse_metadata(body).expect("payload parses");
        assert_eq!(meta.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(meta.current_price, Some(184.25));
        assert_eq!(meta.previous_close, Some(185.64));
        assert_eq!(meta.market_cap, Some(2.85e12));
        assert_eq!(meta.dividend_yield, Some(0.0052));
        assert_eq!(meta.volume, Some(52_164_500.0));
        assert_eq!(
            meta.long_business_summary.as_deref(),
            Some("Apple designs consumer electronics.")
        );
    }

    #[test]
    fn absent_modules_and_zero_raws_become_none() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"shortName": "Shell Co", "marketCap": {"raw": 0.0}},
                    "summaryDetail": {"trailingPE": {}}
                }],
                "error": null
            }
        }"#;

        let meta = parse_metadata(body).expect("payload parses");
        assert_eq!(meta.short_name.as_deref(), Some("Shell Co"));
        assert_eq!(meta.market_cap, None);
        assert_eq!(meta.trailing_pe, None);
        assert_eq!(meta.current_price, None);
        assert_eq!(meta.long_business_summary, None);
    }

    #[test]
    fn quote_summary_error_surfaces_as_provider_error() {
        let body = r#"{
            "quoteSummary": {
                "result": null,
                "error": {"code": "Unauthorized", "description": "Invalid Crumb"}
            }
        }"#;

        let error = parse_metadata(body).expect_err("provider error");
        assert!(error.to_string().contains("Invalid Crumb"));
    }

    #[test]
    fn garbage_body_is_a_decode_error() {
        let error = parse_history("AAPL", "<html>rate limited</html>").expect_err("must fail");
        assert!(matches!(error, FetchError::Decode(_)));
    }
}
