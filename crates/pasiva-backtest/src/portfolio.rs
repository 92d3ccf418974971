use std::collections::HashMap;

use serde::Serialize;

use pasiva_core::{CompositionEntry, Symbol};

use crate::delisting::DelistingRecord;
use crate::resample::ResampledTable;

/// One whole-share holding established at period start, immutable after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPosition {
    pub symbol: Symbol,
    pub capital_allocation: f64,
    /// Start price marked up by the commission rate.
    pub cost_per_share: f64,
    pub purchased_shares: u64,
    /// Shares valued at the raw start price, commission excluded.
    pub position_value: f64,
    /// Allocation minus position value: the explicit fee plus the rounding
    /// remainder, folded together as "capital not converted into shares".
    pub commission_paid: f64,
    pub realized_weight: f64,
}

/// Convert fractional target weights into whole-share positions.
///
/// Walks the table columns in order; a column without a target weight takes
/// no position, and a weight without a column is ignored. Shares round down
/// against the commission-marked-up cost so the allocation is never
/// overspent; a column whose start price is not positive buys zero shares.
pub(crate) fn size_positions(
    weights: &[CompositionEntry],
    prices: &ResampledTable,
    capital: f64,
    commission_rate: f64,
) -> Vec<PortfolioPosition> {
    let weight_of: HashMap<&Symbol, f64> = weights
        .iter()
        .map(|entry| (&entry.symbol, entry.weight))
        .collect();

    let start = prices.start_row();
    let mut positions = Vec::new();
    for (column, symbol) in prices.symbols().iter().enumerate() {
        let Some(&weight) = weight_of.get(symbol) else {
            continue;
        };

        let start_price = start[column];
        let capital_allocation = weight * capital;
        let cost_per_share = start_price * (1.0 + commission_rate);
        let purchased_shares = if cost_per_share > 0.0 {
            (capital_allocation / cost_per_share).floor() as u64
        } else {
            0
        };
        let position_value = start_price * purchased_shares as f64;

        positions.push(PortfolioPosition {
            symbol: symbol.clone(),
            capital_allocation,
            cost_per_share,
            purchased_shares,
            position_value,
            commission_paid: capital_allocation - position_value,
            realized_weight: 0.0,
        });
    }

    let total_value: f64 = positions.iter().map(|p| p.position_value).sum();
    if total_value > 0.0 {
        for position in &mut positions {
            position.realized_weight = position.position_value / total_value;
        }
    }

    positions
}

/// Leftover cash after the initial purchase, plus forced-sale proceeds for
/// delisted holdings.
///
/// Commission is asymmetric across the two sides: a markup on the purchase
/// cost, a haircut on the sale proceeds.
pub(crate) fn reconcile_cash(
    positions: &[PortfolioPosition],
    delistings: &[DelistingRecord],
    capital: f64,
    commission_rate: f64,
) -> (f64, Vec<String>) {
    let spent: f64 = positions
        .iter()
        .map(|position| position.purchased_shares as f64 * position.cost_per_share)
        .sum();
    let mut cash = capital - spent;

    let mut warnings = Vec::new();
    for record in delistings {
        let Some(position) = positions
            .iter()
            .find(|position| position.symbol == record.symbol)
        else {
            continue;
        };
        if position.purchased_shares == 0 {
            continue;
        }

        match record.last_positive_price {
            Some(price) => {
                cash += price * (1.0 - commission_rate) * position.purchased_shares as f64;
            }
            None => warnings.push(format!(
                "{}: no positive price on record, holding liquidated at zero",
                record.symbol
            )),
        }
    }

    (cash, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::month_end_resample;
    use pasiva_core::{MarketDate, PriceTable};

    fn entries(weights: &[(&str, f64)]) -> Vec<CompositionEntry> {
        weights
            .iter()
            .map(|(symbol, weight)| {
                CompositionEntry::new(Symbol::parse(symbol).expect("symbol"), *weight)
                    .expect("entry")
            })
            .collect()
    }

    fn resampled(symbols: &[&str], dates: &[&str], cells: Vec<Vec<Option<f64>>>) -> ResampledTable {
        let table = PriceTable::new(
            symbols
                .iter()
                .map(|s| Symbol::parse(s).expect("symbol"))
                .collect(),
            dates
                .iter()
                .map(|d| MarketDate::parse(d).expect("date"))
                .collect(),
            cells,
        )
        .expect("table");
        month_end_resample(&table).expect("resampled")
    }

    #[test]
    fn shares_round_down_against_marked_up_cost() {
        let prices = resampled(
            &["AMXL"],
            &["2021-01-29", "2021-02-26"],
            vec![vec![Some(100.0)], vec![Some(110.0)]],
        );
        let positions = size_positions(&entries(&[("AMXL", 0.6)]), &prices, 1_000.0, 0.01);

        assert_eq!(positions.len(), 1);
        assert!((positions[0].cost_per_share - 101.0).abs() < 1e-9);
        assert_eq!(positions[0].purchased_shares, 5);
        assert!((positions[0].position_value - 500.0).abs() < 1e-9);
        assert!((positions[0].commission_paid - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_start_price_buys_nothing() {
        let prices = resampled(
            &["AMXL"],
            &["2021-01-29", "2021-02-26"],
            vec![vec![None], vec![Some(110.0)]],
        );
        let positions = size_positions(&entries(&[("AMXL", 0.6)]), &prices, 1_000.0, 0.01);

        assert_eq!(positions[0].purchased_shares, 0);
        assert_eq!(positions[0].position_value, 0.0);
        assert_eq!(positions[0].realized_weight, 0.0);
    }

    #[test]
    fn columns_without_weights_take_no_position() {
        let prices = resampled(
            &["AMXL", "WALMEX"],
            &["2021-01-29"],
            vec![vec![Some(14.0), Some(56.0)]],
        );
        let positions = size_positions(&entries(&[("WALMEX", 0.5)]), &prices, 1_000.0, 0.0);

        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol.as_str(), "WALMEX");
        assert!((positions[0].realized_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn delisted_holdings_sell_at_a_haircut() {
        let positions = vec![PortfolioPosition {
            symbol: Symbol::parse("ELEKTRA").expect("symbol"),
            capital_allocation: 210.0,
            cost_per_share: 20.2,
            purchased_shares: 10,
            position_value: 200.0,
            commission_paid: 10.0,
            realized_weight: 1.0,
        }];
        let delistings = vec![DelistingRecord {
            symbol: Symbol::parse("ELEKTRA").expect("symbol"),
            last_positive_price: Some(20.0),
        }];

        let (cash, warnings) = reconcile_cash(&positions, &delistings, 420.0, 0.01);

        // 420 - 202 spent, plus 20 * 0.99 * 10 proceeds.
        assert!((cash - (218.0 + 198.0)).abs() < 1e-9);
        assert!(warnings.is_empty());
    }

    #[test]
    fn zero_basis_liquidation_warns_instead_of_aborting() {
        let positions = vec![PortfolioPosition {
            symbol: Symbol::parse("ELEKTRA").expect("symbol"),
            capital_allocation: 210.0,
            cost_per_share: 20.2,
            purchased_shares: 10,
            position_value: 200.0,
            commission_paid: 10.0,
            realized_weight: 1.0,
        }];
        let delistings = vec![DelistingRecord {
            symbol: Symbol::parse("ELEKTRA").expect("symbol"),
            last_positive_price: None,
        }];

        let (cash, warnings) = reconcile_cash(&positions, &delistings, 420.0, 0.01);

        assert!((cash - 218.0).abs() < 1e-9);
        assert_eq!(warnings.len(), 1);
    }
}
