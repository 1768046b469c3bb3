//! Test binary for one live correlation query against Yahoo Finance
//!
//! Run with: cargo run --bin correlation_test

use anyhow::Result;
use correlation_now::analysis::{self, AnalysisQuery};
use correlation_now::quotes::Interval;

#[tokio::main]
async fn main() -> Result<()> {
    let symbols: Vec<String> = ["AAPL", "MSFT", "GLD", "BTC-USD"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    println!("=== Correlation Analysis Test ===\n");
    println!("Symbols:  {}", symbols.join(", "));

    let query = AnalysisQuery::new(
        symbols,
        AnalysisQuery::default_start(),
        None,
        Interval::Daily,
    )?;
    println!("Range:    {} to {}", query.start, query.end);
    println!("Interval: {}", query.interval.as_str());

    println!("\n=== Fetching & Aligning ===");
    let report = analysis::run(&query).await?;

    let table = &report.prices;
    println!("Rows:    {}", table.len());
    if let (Some(first), Some(last)) = (table.timestamps.first(), table.timestamps.last()) {
        println!("Span:    {} to {}", first, last);
    }
    for (symbol, column) in table.symbols.iter().zip(&table.columns) {
        let filled = column.iter().filter(|c| c.is_some()).count();
        println!("  {:10} {}/{} cells filled", symbol, filled, column.len());
    }

    println!("\n=== Correlation Matrix ===");
    let matrix = &report.correlations;
    print!("{:>10}", "");
    for symbol in &matrix.symbols {
        print!("{:>10}", symbol);
    }
    println!();
    for (i, symbol) in matrix.symbols.iter().enumerate() {
        print!("{:>10}", symbol);
        for j in 0..matrix.symbols.len() {
            match matrix.matrix[i][j] {
                Some(r) => print!("{:>10.2}", r),
                None => print!("{:>10}", "-"),
            }
        }
        println!();
    }

    println!("\n=== Top Pairs ===");
    for pair in matrix.pairs.iter().take(5) {
        match pair.correlation {
            Some(r) => println!("  {} / {}: {:.2}", pair.symbol1, pair.symbol2, r),
            None => println!("  {} / {}: undefined", pair.symbol1, pair.symbol2),
        }
    }

    println!("\n=== Done ===");
    Ok(())
}
