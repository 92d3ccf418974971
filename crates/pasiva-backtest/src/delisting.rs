use pasiva_core::{PriceTable, Symbol};

/// A column that stopped trading (or was not yet listed) somewhere inside
/// the simulation window, with the liquidation basis for the forced sale.
#[derive(Debug, Clone, PartialEq)]
pub struct DelistingRecord {
    pub symbol: Symbol,
    /// Chronologically last strictly-positive observation. `None` when the
    /// column never printed a positive price; in that case the holding
    /// liquidates at zero instead of aborting the simulation.
    pub last_positive_price: Option<f64>,
}

/// Scan the daily table for columns with missing observations.
pub fn detect_delistings(prices: &PriceTable) -> Vec<DelistingRecord> {
    let mut records = Vec::new();

    for (column, symbol) in prices.symbols().iter().enumerate() {
        let mut has_gap = false;
        let mut last_positive_price = None;
        for cell in prices.column(column) {
            match cell {
                None => has_gap = true,
                Some(price) if price > 0.0 => last_positive_price = Some(price),
                Some(_) => {}
            }
        }

        if has_gap {
            records.push(DelistingRecord {
                symbol: symbol.clone(),
                last_positive_price,
            });
        }
    }

    records
}
