//! Quote Fetching
//!
//! Close-price series for the correlation analysis, fetched per symbol from
//! Yahoo Finance. The response keeps the provider's shape: a bare series for
//! a single-symbol request, a map keyed by symbol otherwise. Results are
//! memoized for the process lifetime, keyed by the normalized query.

pub mod yahoo;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Einzelner Kursdatenpunkt
///
/// `timestamp` is the bar open time as reported by the provider (UTC).
/// Only `close` feeds the analysis; the remaining fields serve tooltips.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    pub volume: Option<i64>,
}

/// Sampling interval for chart requests
///
/// Wire codes double as the Yahoo chart `interval` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1h")]
    Hourly,
    #[serde(rename = "30m")]
    ThirtyMinute,
    #[serde(rename = "15m")]
    FifteenMinute,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "1m")]
    OneMinute,
}

impl Interval {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1d" => Some(Self::Daily),
            "1h" => Some(Self::Hourly),
            "30m" => Some(Self::ThirtyMinute),
            "15m" => Some(Self::FifteenMinute),
            "5m" => Some(Self::FiveMinute),
            "1m" => Some(Self::OneMinute),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Hourly => "1h",
            Self::ThirtyMinute => "30m",
            Self::FifteenMinute => "15m",
            Self::FiveMinute => "5m",
            Self::OneMinute => "1m",
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::Daily
    }
}

/// Raw fetch result, in whichever shape the provider chose.
///
/// Which symbol count produces which shape is the provider's business;
/// consumers match on the variant they actually received instead of
/// assuming a threshold.
#[derive(Debug, Clone)]
pub enum SeriesResponse {
    /// A bare series, how single-symbol requests are answered.
    Flat(Vec<Quote>),
    /// Series keyed by symbol. A symbol missing from the map is the
    /// explicit "no data" signal.
    Grouped(HashMap<String, Vec<Quote>>),
}

/// Normalized cache key for one fetch: symbol order and duplicates in the
/// selection do not produce distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    symbols: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
    interval: Interval,
}

impl FetchKey {
    pub fn new(symbols: &[String], start: NaiveDate, end: NaiveDate, interval: Interval) -> Self {
        let mut symbols = symbols.to_vec();
        symbols.sort();
        symbols.dedup();
        Self {
            symbols,
            start,
            end,
            interval,
        }
    }
}

/// Global fetch memo, never evicted within a process lifetime
static FETCH_CACHE: Lazy<Mutex<HashMap<FetchKey, Arc<SeriesResponse>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cache_get(key: &FetchKey) -> Option<Arc<SeriesResponse>> {
    FETCH_CACHE.lock().ok().and_then(|cache| cache.get(key).cloned())
}

fn cache_put(key: FetchKey, response: Arc<SeriesResponse>) {
    if let Ok(mut cache) = FETCH_CACHE.lock() {
        cache.insert(key, response);
    }
}

/// Fetch close-price series for a set of symbols, one chart call per symbol.
///
/// Symbols Yahoo has no data for are tolerated: they are omitted from the
/// grouped map (or yield an empty flat series) and logged at warn level.
/// Transport and non-tolerable API errors fail the whole batch; no partial
/// results are fabricated.
///
/// Repeated queries are served from a process-wide memo. Historical bars
/// never change, but a range ending today caches today's still-forming bar
/// for the rest of the process lifetime.
pub async fn fetch_close_series(
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    interval: Interval,
) -> Result<Arc<SeriesResponse>> {
    let key = FetchKey::new(symbols, start, end, interval);
    if let Some(cached) = cache_get(&key) {
        log::debug!("Quote cache hit for {} symbol(s)", key.symbols.len());
        return Ok(cached);
    }

    let response = if key.symbols.len() == 1 {
        let quotes = yahoo::fetch_close_history(&key.symbols[0], start, end, interval).await?;
        if quotes.is_empty() {
            log::warn!("No quotes for {}", key.symbols[0]);
        }
        SeriesResponse::Flat(quotes)
    } else {
        let mut series = HashMap::new();
        for symbol in &key.symbols {
            let quotes = yahoo::fetch_close_history(symbol, start, end, interval).await?;
            if quotes.is_empty() {
                log::warn!("No quotes for {}, column stays empty", symbol);
                continue;
            }
            series.insert(symbol.clone(), quotes);
        }
        SeriesResponse::Grouped(series)
    };

    let response = Arc::new(response);
    cache_put(key, Arc::clone(&response));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_code_roundtrip() {
        let all = [
            Interval::Daily,
            Interval::Hourly,
            Interval::ThirtyMinute,
            Interval::FifteenMinute,
            Interval::FiveMinute,
            Interval::OneMinute,
        ];
        for interval in all {
            assert_eq!(Interval::from_str(interval.as_str()), Some(interval));
        }
        assert_eq!(Interval::from_str("1D"), Some(Interval::Daily));
        assert_eq!(Interval::from_str("2h"), None);
        assert_eq!(Interval::default(), Interval::Daily);
    }

    #[test]
    fn test_interval_serializes_as_wire_code() {
        assert_eq!(serde_json::to_string(&Interval::ThirtyMinute).unwrap(), "\"30m\"");
        assert_eq!(
            serde_json::from_str::<Interval>("\"1h\"").unwrap(),
            Interval::Hourly
        );
    }

    #[test]
    fn test_fetch_key_normalizes_order_and_duplicates() {
        let start = date(2024, 1, 1);
        let end = date(2024, 6, 30);

        let a = FetchKey::new(
            &["MSFT".to_string(), "AAPL".to_string()],
            start,
            end,
            Interval::Daily,
        );
        let b = FetchKey::new(
            &["AAPL".to_string(), "MSFT".to_string(), "AAPL".to_string()],
            start,
            end,
            Interval::Daily,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_fetch_key_distinguishes_parameters() {
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let start = date(2024, 1, 1);
        let end = date(2024, 6, 30);

        let daily = FetchKey::new(&symbols, start, end, Interval::Daily);
        let hourly = FetchKey::new(&symbols, start, end, Interval::Hourly);
        let shifted = FetchKey::new(&symbols, start, date(2024, 7, 1), Interval::Daily);

        assert_ne!(daily, hourly);
        assert_ne!(daily, shifted);
    }

    #[tokio::test]
    #[ignore] // Requires network
    async fn test_fetch_close_series_grouped() {
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let result = fetch_close_series(
            &symbols,
            date(2024, 1, 1),
            date(2024, 1, 31),
            Interval::Daily,
        )
        .await;
        assert!(result.is_ok(), "Fetch failed: {:?}", result.err());

        match result.unwrap().as_ref() {
            SeriesResponse::Grouped(map) => {
                assert!(map.contains_key("AAPL"));
                assert!(map.contains_key("MSFT"));
            }
            SeriesResponse::Flat(_) => panic!("Expected grouped response for two symbols"),
        }
    }
}
