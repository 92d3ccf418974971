// Shared fixture builders for the behavior tests.
pub use pasiva_core::{
    CompositionEntry, MarketDate, PriceHistory, PricePoint, PriceTable, Symbol,
};

pub fn symbol(input: &str) -> Symbol {
    Symbol::parse(input).expect("fixture symbol")
}

pub fn date(input: &str) -> MarketDate {
    MarketDate::parse(input).expect("fixture date")
}

pub fn entries(weights: &[(&str, f64)]) -> Vec<CompositionEntry> {
    weights
        .iter()
        .map(|(ticker, weight)| CompositionEntry::new(symbol(ticker), *weight).expect("fixture entry"))
        .collect()
}

/// Build a price table from per-date rows of optional prices.
pub fn table(symbols: &[&str], rows: &[(&str, &[Option<f64>])]) -> PriceTable {
    PriceTable::new(
        symbols.iter().map(|s| symbol(s)).collect(),
        rows.iter().map(|(d, _)| date(d)).collect(),
        rows.iter().map(|(_, cells)| cells.to_vec()).collect(),
    )
    .expect("fixture table")
}

pub fn history(ticker: &str, points: &[(&str, Option<f64>)]) -> PriceHistory {
    PriceHistory::new(
        symbol(ticker),
        points
            .iter()
            .map(|(d, price)| PricePoint {
                date: date(d),
                adj_close: *price,
            })
            .collect(),
    )
    .expect("fixture history")
}
