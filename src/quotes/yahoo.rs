//! Yahoo Finance Chart Provider
//!
//! Fetches close-price history from the chart API v8. No API key required.
//! - One endpoint covers every asset class in the catalog: equities, ETFs,
//!   crypto pairs (`BTC-USD`), FX (`EURUSD=X`), indices (`^GDAXI`),
//!   commodity futures (`GC=F`)
//! - Intraday intervals down to 1 minute; how far back each interval is
//!   served is decided by Yahoo, not by this client

use super::{Interval, Quote};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// HTTP Client mit korrekten Headers erstellen
fn create_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
}

/// Symbol URL erstellen (encoded)
fn symbol_url(symbol: &str) -> String {
    let encoded = urlencoding::encode(symbol);
    format!("{}/{}", BASE_URL, encoded)
}

/// Fetch close-price bars for one symbol.
///
/// Returns the bars Yahoo has for the window, sorted ascending; an empty
/// vector when the symbol exists but has no data there (or is unknown or
/// delisted). Transport failures and non-tolerable API errors are `Err`.
pub async fn fetch_close_history(
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
    interval: Interval,
) -> Result<Vec<Quote>> {
    // Yahoo verwendet Unix-Timestamps
    let from_ts = from
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0);
    let to_ts = to
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0);

    let url = format!(
        "{}?period1={}&period2={}&interval={}",
        symbol_url(symbol),
        from_ts,
        to_ts,
        interval.as_str()
    );
    log::debug!("Fetching Yahoo close history for {} from {}", symbol, url);

    let client = create_client()?;
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| anyhow!("Request failed for {}: {}", symbol, e))?;

    // Unknown symbols come back as 404 with a chart error in the body, so
    // the error classification has to run before the status check.
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response for {}: {}", symbol, e))?;

    let data: serde_json::Value = match serde_json::from_str(&body) {
        Ok(data) => data,
        Err(e) => {
            if !status.is_success() {
                log::error!("Yahoo API error for {}: {} - {}", symbol, status, body);
                return Err(anyhow!("HTTP error for {}: {} - {}", symbol, status, body));
            }
            return Err(anyhow!("Failed to parse JSON for {}: {}", symbol, e));
        }
    };

    if let Some(error) = data.get("chart").and_then(|c| c.get("error")).and_then(|e| e.as_object()) {
        let code = error.get("code").and_then(|c| c.as_str()).unwrap_or("unknown");
        let desc = error.get("description").and_then(|d| d.as_str()).unwrap_or("No description");
        if is_no_data_error(code, desc) {
            log::warn!("Yahoo has no data for {}: {} - {}", symbol, code, desc);
            return Ok(vec![]);
        }
        log::error!("Yahoo API returned error for {}: {} - {}", symbol, code, desc);
        return Err(anyhow!("Yahoo API error for {}: {} - {}", symbol, code, desc));
    }

    if !status.is_success() {
        log::error!("Yahoo API error for {}: {} - {}", symbol, status, body);
        return Err(anyhow!("HTTP error for {}: {} - {}", symbol, status, body));
    }

    parse_close_series(&data)
}

/// Chart errors that mean "this symbol has nothing here" rather than a
/// broken request. Those keep an empty series instead of failing the batch.
fn is_no_data_error(code: &str, description: &str) -> bool {
    let code = code.to_lowercase();
    let description = description.to_lowercase();

    code == "not found"
        || description.contains("no data found")
        || description.contains("data doesn't exist")
        || description.contains("delisted")
}

/// Close-Serie aus Yahoo Response parsen
fn parse_close_series(data: &serde_json::Value) -> Result<Vec<Quote>> {
    let chart = data
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(|r| r.get(0))
        .ok_or_else(|| anyhow!("Invalid response format"))?;

    // A result without bars (nothing traded in the window) carries meta
    // but no timestamp array.
    let timestamps = match chart.get("timestamp").and_then(|t| t.as_array()) {
        Some(t) => t,
        None => return Ok(vec![]),
    };

    let quote_data = chart
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.get(0))
        .ok_or_else(|| anyhow!("Missing quote data"))?;

    let closes = quote_data
        .get("close")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow!("Missing close prices"))?;
    let highs = quote_data.get("high").and_then(|h| h.as_array());
    let lows = quote_data.get("low").and_then(|l| l.as_array());
    let opens = quote_data.get("open").and_then(|o| o.as_array());
    let volumes = quote_data.get("volume").and_then(|v| v.as_array());

    let mut quotes = Vec::new();

    for (i, ts) in timestamps.iter().enumerate() {
        let timestamp = match ts.as_i64().and_then(|t| chrono::DateTime::from_timestamp(t, 0)) {
            Some(dt) => dt,
            None => continue,
        };

        // Yahoo pads bars it has no trade for with nulls
        let close = match closes.get(i).and_then(|v| v.as_f64()) {
            Some(c) if c.is_finite() => c,
            _ => continue,
        };

        let high = highs.and_then(|arr| arr.get(i)).and_then(|v| v.as_f64());
        let low = lows.and_then(|arr| arr.get(i)).and_then(|v| v.as_f64());
        let open = opens.and_then(|arr| arr.get(i)).and_then(|v| v.as_f64());
        let volume = volumes.and_then(|arr| arr.get(i)).and_then(|v| v.as_i64());

        quotes.push(Quote {
            timestamp,
            close,
            high,
            low,
            open,
            volume,
        });
    }

    quotes.sort_by_key(|q| q.timestamp);

    Ok(quotes)
}
