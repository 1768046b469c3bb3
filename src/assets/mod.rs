//! Built-in asset catalog
//!
//! Symbol lists behind the UI pickers, grouped by asset class. Symbols use
//! Yahoo ticker syntax (`BTC-USD`, `EURUSD=X`, `^GDAXI`, `GC=F`); the
//! analysis itself treats every symbol the same, the class only drives
//! picker grouping.

use serde::{Deserialize, Serialize};

/// Asset class for picker grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Equity,
    Etf,
    Crypto,
    Currency,
    Index,
    Commodity,
}

impl AssetClass {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EQUITY" | "STOCK" => Some(Self::Equity),
            "ETF" | "FUND" => Some(Self::Etf),
            "CRYPTO" => Some(Self::Crypto),
            "CURRENCY" | "FX" => Some(Self::Currency),
            "INDEX" => Some(Self::Index),
            "COMMODITY" => Some(Self::Commodity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equity => "EQUITY",
            Self::Etf => "ETF",
            Self::Crypto => "CRYPTO",
            Self::Currency => "CURRENCY",
            Self::Index => "INDEX",
            Self::Commodity => "COMMODITY",
        }
    }

    /// Display name for pickers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Equity => "Stocks",
            Self::Etf => "ETFs",
            Self::Crypto => "Crypto",
            Self::Currency => "Currencies",
            Self::Index => "Indices",
            Self::Commodity => "Commodities",
        }
    }
}

/// All classes in catalog order
pub fn all_classes() -> &'static [AssetClass] {
    &[
        AssetClass::Equity,
        AssetClass::Etf,
        AssetClass::Crypto,
        AssetClass::Currency,
        AssetClass::Index,
        AssetClass::Commodity,
    ]
}

/// Symbols available for one asset class, in catalog order
pub fn symbols_for(class: AssetClass) -> &'static [&'static str] {
    match class {
        AssetClass::Equity => &["AAPL", "MSFT", "GOOGL", "TSLA", "AMZN", "LDO.MI"],
        AssetClass::Etf => &["SPY", "QQQ", "GLD", "TLT", "XLK", "XLF", "SPHB"],
        AssetClass::Crypto => &[
            "BTC-USD", "ETH-USD", "XRP-USD", "LINK-USD", "ADA-USD", "SOL-USD",
        ],
        AssetClass::Currency => &[
            "AUDCAD=X", "AUDCHF=X", "AUDJPY=X", "AUDNZD=X", "AUDUSD=X", "CADCHF=X",
            "CADJPY=X", "CHFJPY=X", "EURAUD=X", "EURCAD=X", "EURCHF=X", "EURGBP=X",
            "EURJPY=X", "EURNZD=X", "EURSEK=X", "EURUSD=X", "GBPAUD=X", "GBPCAD=X",
            "GBPCHF=X", "GBPJPY=X", "GBPNZD=X", "GBPUSD=X", "NZDCAD=X", "NZDCHF=X",
            "NZDJPY=X", "NZDUSD=X", "USDCAD=X", "USDCHF=X", "USDCNH=X", "USDJPY=X",
            "USDSEK=X", "USDBRL=X",
        ],
        AssetClass::Index => &[
            "^N225", "^NSEI", "^STOXX50E", "^IBEX", "^GDAXI", "^FCHI", "FTSEMIB.MI",
            "^FTSE", "^SPX", "^VIX", "000300.SS", "^HSI", "^NDX", "RTY=F",
        ],
        AssetClass::Commodity => &["GC=F", "CL=F", "SI=F", "NG=F", "HG=F"],
    }
}

/// Combined symbol list for a picker selection, preserving catalog order
pub fn symbols_for_classes(classes: &[AssetClass]) -> Vec<String> {
    let mut symbols = Vec::new();
    for class in classes {
        symbols.extend(symbols_for(*class).iter().map(|s| s.to_string()));
    }
    symbols
}
