//! Aligned price table
//!
//! Turns the fetcher's ragged per-symbol series into one rectangular table:
//! rows = union of all timestamps, columns = requested symbols, cells =
//! `Option<f64>` close price. Missing is `None` throughout; 0.0 is a valid
//! price and never stands in for a gap.

use crate::quotes::{Quote, SeriesResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Rectangular close-price table, timestamps x symbols.
///
/// `columns[i]` belongs to `symbols[i]` and has one entry per timestamp.
/// Every row carries at least one `Some`; a symbol the provider had no data
/// for is an all-`None` column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub timestamps: Vec<DateTime<Utc>>,
    pub symbols: Vec<String>,
    pub columns: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Column for one symbol, if requested
    pub fn column(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    /// Subset of columns for the comparative price chart.
    ///
    /// Keeps the caller's order; symbols not present in the table are
    /// skipped. Rows are kept as-is, so a subset may contain all-`None`
    /// rows contributed by dropped columns.
    pub fn select(&self, symbols: &[String]) -> PriceTable {
        let mut kept_symbols = Vec::new();
        let mut kept_columns = Vec::new();
        for symbol in symbols {
            if let Some(i) = self.symbols.iter().position(|s| s == symbol) {
                kept_symbols.push(symbol.clone());
                kept_columns.push(self.columns[i].clone());
            }
        }
        PriceTable {
            timestamps: self.timestamps.clone(),
            symbols: kept_symbols,
            columns: kept_columns,
        }
    }
}

/// Build the aligned table from whichever response shape the provider chose.
///
/// A flat series is attributed to the requested symbol only when exactly one
/// symbol was requested; a flat answer to a multi-symbol request is
/// ambiguous, so it is logged and treated as data for none rather than
/// guessed at. Rows where no symbol traded are dropped before the per-column
/// forward fill, so a fill never bridges a row that no longer exists.
pub fn align(response: &SeriesResponse, symbols: &[String]) -> PriceTable {
    let located: Vec<Option<&[Quote]>> = match response {
        SeriesResponse::Flat(quotes) => {
            if symbols.len() == 1 {
                vec![Some(quotes.as_slice())]
            } else {
                log::warn!(
                    "Flat series for {} requested symbols, treating as no data",
                    symbols.len()
                );
                vec![None; symbols.len()]
            }
        }
        SeriesResponse::Grouped(map) => symbols
            .iter()
            .map(|s| map.get(s).map(|q| q.as_slice()))
            .collect(),
    };

    // Union of all timestamps, sorted and deduplicated
    let index: Vec<DateTime<Utc>> = located
        .iter()
        .flatten()
        .flat_map(|quotes| quotes.iter().map(|q| q.timestamp))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(symbols.len());
    for series in &located {
        let column = match series {
            Some(quotes) => {
                let by_timestamp: HashMap<DateTime<Utc>, f64> =
                    quotes.iter().map(|q| (q.timestamp, q.close)).collect();
                index
                    .iter()
                    .map(|ts| by_timestamp.get(ts).copied())
                    .collect()
            }
            None => vec![None; index.len()],
        };
        columns.push(column);
    }

    // Drop rows where nothing traded
    let keep: Vec<usize> = (0..index.len())
        .filter(|&row| columns.iter().any(|col| col[row].is_some()))
        .collect();
    let timestamps: Vec<DateTime<Utc>> = keep.iter().map(|&row| index[row]).collect();
    let mut columns: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|col| keep.iter().map(|&row| col[row]).collect())
        .collect();

    // Forward-fill per column; a leading gap has nothing to carry and stays None
    for column in &mut columns {
        let mut last = None;
        for cell in column.iter_mut() {
            match cell {
                Some(value) => last = Some(*value),
                None => *cell = last,
            }
        }
    }

    PriceTable {
        timestamps,
        symbols: symbols.to_vec(),
        columns,
    }
}
