//! Curated universe presets.
//!
//! The large-cap and NASDAQ lists are static fallbacks; a screener-backed
//! universe source would replace them without touching the scanner.

use std::collections::BTreeSet;

use crate::error::ScanError;
use crate::models::{Universe, UniverseName};

/// Curated large-cap universe (S&P 500-like).
pub const LARGE_CAP: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "BRK.B", "V", "UNH",
    "JNJ", "WMT", "JPM", "MA", "PG", "HD", "CVX", "MRK", "ABBV", "KO",
    "PEP", "COST", "AVGO", "TMO", "MCD", "ABT", "DHR", "VZ", "CSCO", "ACN",
    "CRM", "ADBE", "TXN", "NEE", "NKE", "QCOM", "ORCL", "LIN", "PM", "AMD",
    "INTC", "BA", "DIS", "IBM", "GE", "CAT", "RTX", "UPS", "NOW", "SBUX",
    "LOW", "SPGI", "BLK", "GS", "AXP", "HON", "BKNG", "SYK", "MDLZ", "GILD",
    "CVS", "USB", "BMY", "C", "PLD", "ISRG", "DE", "CB", "AMT", "MMC",
    "TJX", "SO", "BDX", "CI", "SCHW", "MO", "DUK", "BSX", "ZTS", "ITW",
    "REGN", "PNC", "EOG", "CL", "APD", "WM", "SHW", "TT", "FIS", "COP",
    "CME", "NOC", "HUM", "EQIX", "ICE", "PSX", "NSC", "MCO", "AON", "GD",
];

/// Curated NASDAQ 100 universe.
pub const NASDAQ_100: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "GOOG", "AMZN", "NVDA", "META", "TSLA", "AVGO", "COST",
    "ASML", "PEP", "AZN", "TMUS", "CSCO", "ADBE", "AMD", "NFLX", "INTC", "CMCSA",
    "TXN", "QCOM", "INTU", "AMGN", "HON", "AMAT", "ARM", "BKNG", "ISRG", "ADP",
    "VRTX", "SBUX", "GILD", "ADI", "MU", "PANW", "LRCX", "REGN", "MDLZ", "MELI",
    "PDD", "SNPS", "CDNS", "KLAC", "PYPL", "CRWD", "MRVL", "MAR", "ABNB", "CSX",
    "ORLY", "FTNT", "DASH", "ADSK", "WDAY", "NXPI", "MNST", "ROP", "PCAR", "CEG",
    "CHTR", "CPRT", "PAYX", "ROST", "AEP", "ODFL", "FAST", "KDP", "EA", "MCHP",
    "DXCM", "VRSK", "BKR", "XEL", "CTSH", "GEHC", "TEAM", "EXC", "KHC", "LULU",
    "TTD", "IDXX", "CCEP", "FANG", "ZS", "ON", "CTAS", "ANSS", "CDW", "WBD",
    "MDB", "MRNA", "BIIB", "DDOG", "GFS", "ILMN", "WBA", "SMCI", "ALGN", "DLTR",
];

/// Resolve a universe into a concrete, deduplicated, sorted ticker list.
///
/// Sorting keeps scan dispatch order deterministic.
///
/// # Errors
///
/// Returns [`ScanError::InvalidRequest`] for an empty explicit list.
pub fn resolve(universe: &Universe) -> Result<Vec<String>, ScanError> {
    let tickers: BTreeSet<String> = match universe {
        Universe::Named(UniverseName::LargeCap) => {
            LARGE_CAP.iter().map(ToString::to_string).collect()
        }
        Universe::Named(UniverseName::Nasdaq100) => {
            NASDAQ_100.iter().map(ToString::to_string).collect()
        }
        Universe::Named(UniverseName::Combined) => LARGE_CAP
            .iter()
            .chain(NASDAQ_100.iter())
            .map(ToString::to_string)
            .collect(),
        Universe::Explicit(tickers) => {
            if tickers.is_empty() {
                return Err(ScanError::invalid_request("explicit universe is empty"));
            }
            tickers.iter().map(|t| t.trim().to_uppercase()).collect()
        }
    };

    Ok(tickers.into_iter().collect())
}
