//! Error types for query validation and the correlation engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors an analysis run can surface to the caller.
///
/// Missing data for an individual symbol is not an error: the symbol keeps
/// its (empty) column and its correlations come back as missing values.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Correlation needs at least two distinct symbols.
    #[error("at least 2 symbols required, {selected} selected")]
    TooFewSymbols { selected: usize },

    /// The requested range ends before it starts.
    #[error("invalid date range: {start} to {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The quote fetch failed as a whole (network, HTTP, malformed payload).
    #[error("quote provider error: {0}")]
    Provider(#[from] anyhow::Error),

    /// Fewer than two symbols had any quotes after alignment.
    #[error("insufficient data: only {with_data} symbol(s) returned quotes")]
    InsufficientData { with_data: usize },
}
