//! Alignment & Correlation Engine
//!
//! The one computation this crate exists for: validated query in, aligned
//! close-price table plus Pearson correlation matrix out. `run` drives the
//! fetch; `analyze` is the pure engine entry the tests use directly.

pub mod correlation;
pub mod table;

pub use correlation::{CorrelationMatrix, CorrelationPair};
pub use table::PriceTable;

use crate::error::AnalysisError;
use crate::quotes::{self, Interval, SeriesResponse};
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

/// Validated analysis parameters.
///
/// Construction enforces what the UI would otherwise let through: at least
/// 2 distinct symbols and a date range that does not end before it starts.
#[derive(Debug, Clone)]
pub struct AnalysisQuery {
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
}

impl AnalysisQuery {
    /// Validate a selection. Duplicate symbols collapse to their first
    /// occurrence; `end` defaults to today.
    pub fn new(
        symbols: Vec<String>,
        start: NaiveDate,
        end: Option<NaiveDate>,
        interval: Interval,
    ) -> Result<Self, AnalysisError> {
        let mut distinct: Vec<String> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !distinct.contains(&symbol) {
                distinct.push(symbol);
            }
        }

        if distinct.len() < 2 {
            return Err(AnalysisError::TooFewSymbols {
                selected: distinct.len(),
            });
        }

        let end = end.unwrap_or_else(|| Utc::now().date_naive());
        if end < start {
            return Err(AnalysisError::InvalidDateRange { start, end });
        }

        Ok(Self {
            symbols: distinct,
            start,
            end,
            interval,
        })
    }

    /// Default lookback: two years back from today
    pub fn default_start() -> NaiveDate {
        Utc::now().date_naive() - Duration::days(365 * 2)
    }
}

/// Everything the renderer needs for one query: the aligned table for the
/// line chart, the matrix for the heatmap.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub prices: PriceTable,
    pub correlations: CorrelationMatrix,
}

/// Pure engine entry: align the response, correlate the table.
pub fn analyze(
    response: &SeriesResponse,
    symbols: &[String],
) -> Result<AnalysisReport, AnalysisError> {
    let prices = table::align(response, symbols);
    let correlations = correlation::correlate(&prices)?;
    Ok(AnalysisReport {
        prices,
        correlations,
    })
}

/// Run one query end to end: fetch (memoized), align, correlate.
pub async fn run(query: &AnalysisQuery) -> Result<AnalysisReport, AnalysisError> {
    log::debug!(
        "Analysis run: {} symbols, {} to {}, interval {}",
        query.symbols.len(),
        query.start,
        query.end,
        query.interval.as_str()
    );
    let response =
        quotes::fetch_close_series(&query.symbols, query.start, query.end, query.interval)
            .await?;
    analyze(&response, &query.symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::Quote;
    use chrono::DateTime;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn series(points: &[(i64, f64)]) -> Vec<Quote> {
        points
            .iter()
            .map(|&(ts, close)| Quote {
                timestamp: DateTime::from_timestamp(ts, 0).unwrap(),
                close,
                high: None,
                low: None,
                open: None,
                volume: None,
            })
            .collect()
    }

    #[test]
    fn test_query_rejects_too_few_symbols() {
        let result = AnalysisQuery::new(
            symbols(&["AAPL"]),
            date(2024, 1, 1),
            Some(date(2024, 6, 30)),
            Interval::Daily,
        );
        match result {
            Err(AnalysisError::TooFewSymbols { selected }) => assert_eq!(selected, 1),
            other => panic!("Expected TooFewSymbols, got {:?}", other),
        }
    }

    #[test]
    fn test_query_collapses_duplicates_keeping_order() {
        let query = AnalysisQuery::new(
            symbols(&["MSFT", "AAPL", "MSFT", "AAPL"]),
            date(2024, 1, 1),
            Some(date(2024, 6, 30)),
            Interval::Daily,
        )
        .unwrap();
        assert_eq!(query.symbols, vec!["MSFT", "AAPL"]);
    }

    #[test]
    fn test_query_all_duplicates_is_one_symbol() {
        let result = AnalysisQuery::new(
            symbols(&["AAPL", "AAPL", "AAPL"]),
            date(2024, 1, 1),
            Some(date(2024, 6, 30)),
            Interval::Daily,
        );
        assert!(matches!(
            result,
            Err(AnalysisError::TooFewSymbols { selected: 1 })
        ));
    }

    #[test]
    fn test_query_rejects_inverted_range() {
        let result = AnalysisQuery::new(
            symbols(&["AAPL", "MSFT"]),
            date(2024, 6, 30),
            Some(date(2024, 1, 1)),
            Interval::Daily,
        );
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_query_end_defaults_to_today() {
        let query = AnalysisQuery::new(
            symbols(&["AAPL", "MSFT"]),
            date(2024, 1, 1),
            None,
            Interval::Hourly,
        )
        .unwrap();
        assert_eq!(query.end, Utc::now().date_naive());
        assert_eq!(query.interval, Interval::Hourly);
    }

    #[test]
    fn test_default_start_is_two_years_back() {
        let start = AnalysisQuery::default_start();
        assert_eq!(Utc::now().date_naive() - start, Duration::days(730));
    }

    #[test]
    fn test_analyze_end_to_end_anticorrelated() {
        let mut map = HashMap::new();
        map.insert(
            "X".to_string(),
            series(&[(100, 100.0), (200, 101.0), (300, 102.0)]),
        );
        map.insert(
            "Y".to_string(),
            series(&[(100, 50.0), (200, 49.0), (300, 48.0)]),
        );
        let response = SeriesResponse::Grouped(map);

        let report = analyze(&response, &symbols(&["X", "Y"])).unwrap();

        assert_eq!(report.prices.len(), 3);
        assert_eq!(report.correlations.matrix[0][1], Some(-1.0));
        assert_eq!(report.correlations.matrix[0][0], Some(1.0));
        assert_eq!(report.correlations.matrix[1][1], Some(1.0));
    }

    #[test]
    fn test_analyze_signals_insufficient_data() {
        let mut map = HashMap::new();
        map.insert("X".to_string(), series(&[(100, 1.0), (200, 2.0)]));
        let response = SeriesResponse::Grouped(map);

        let result = analyze(&response, &symbols(&["X", "GONE", "ALSOGONE"]));
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientData { with_data: 1 })
        ));
    }

    #[test]
    fn test_report_serializes_missing_as_null() {
        let mut map = HashMap::new();
        map.insert("A".to_string(), series(&[(100, 5.0), (200, 5.0)]));
        map.insert("B".to_string(), series(&[(100, 1.0), (200, 2.0)]));
        let response = SeriesResponse::Grouped(map);

        let report = analyze(&response, &symbols(&["A", "B"])).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        // A is constant, so its correlations are explicit nulls
        assert_eq!(json["correlations"]["matrix"][0][1], serde_json::Value::Null);
        assert_eq!(json["correlations"]["matrix"][1][1], 1.0);
        assert_eq!(json["prices"]["symbols"][0], "A");
    }
}
