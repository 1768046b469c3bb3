//! Pearson correlation over the aligned price table
//!
//! Each pair uses pairwise-complete observations: only rows where both
//! columns hold a value. Undefined coefficients (too few shared points,
//! zero variance on either side) are `None`, never 0.0 — a zero reads as
//! "uncorrelated" on the heatmap and would misstate "unknown".

use super::table::PriceTable;
use crate::error::AnalysisError;
use serde::Serialize;

/// One unordered symbol pair with its coefficient
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationPair {
    pub symbol1: String,
    pub symbol2: String,
    pub correlation: Option<f64>,
}

/// Full symmetric matrix plus the ranked pair list for the heatmap sidebar.
///
/// `matrix[i][j]` correlates `symbols[i]` with `symbols[j]`; coefficients
/// are rounded to 2 decimals. Pairs are sorted by absolute correlation
/// descending, undefined pairs last.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
    pub pairs: Vec<CorrelationPair>,
}

/// Pearson coefficient over the rows where both columns have a value.
///
/// `None` when fewer than 2 complete observations remain or either side has
/// zero variance over them.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let complete: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if complete.len() < 2 {
        return None;
    }

    let n = complete.len() as f64;
    let mean_a = complete.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = complete.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &complete {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a > 0.0 && var_b > 0.0 {
        Some(cov / (var_a.sqrt() * var_b.sqrt()))
    } else {
        None
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the correlation matrix for an aligned table.
///
/// Fails with `InsufficientData` when fewer than 2 columns contain any
/// value at all; a 1x1 or empty matrix is never produced. The diagonal is
/// `Some(1.0)` where the column has variance and `None` where it does not
/// (constant price, fewer than 2 points).
pub fn correlate(table: &PriceTable) -> Result<CorrelationMatrix, AnalysisError> {
    let with_data = table
        .columns
        .iter()
        .filter(|col| col.iter().any(|cell| cell.is_some()))
        .count();
    if with_data < 2 {
        return Err(AnalysisError::InsufficientData { with_data });
    }

    let n = table.symbols.len();
    let mut matrix = vec![vec![None; n]; n];
    let mut pairs = Vec::new();

    for i in 0..n {
        for j in i..n {
            let coefficient =
                pairwise_pearson(&table.columns[i], &table.columns[j]).map(round2);
            matrix[i][j] = coefficient;
            matrix[j][i] = coefficient;

            if i < j {
                pairs.push(CorrelationPair {
                    symbol1: table.symbols[i].clone(),
                    symbol2: table.symbols[j].clone(),
                    correlation: coefficient,
                });
            }
        }
    }

    // Most correlated first, undefined pairs at the end
    pairs.sort_by(|a, b| {
        let ka = a.correlation.map(f64::abs);
        let kb = b.correlation.map(f64::abs);
        kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(CorrelationMatrix {
        symbols: table.symbols.clone(),
        matrix,
        pairs,
    })
}
