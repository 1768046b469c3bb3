//! Cross-asset price correlation analysis
//!
//! Fetches close-price series from Yahoo Finance for a user-selected set of
//! symbols, aligns them onto a shared timestamp index, and computes the
//! pairwise-complete Pearson correlation matrix. The UI and the chart
//! rendering live in the embedding application; this crate owns the data
//! pipeline between them.

pub mod analysis;
pub mod assets;
pub mod error;
pub mod quotes;

pub use analysis::{AnalysisQuery, AnalysisReport};
pub use error::AnalysisError;
