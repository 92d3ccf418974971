use serde::Serialize;

use pasiva_core::MarketDate;

use crate::portfolio::PortfolioPosition;
use crate::resample::ResampledTable;

/// Portfolio state at one resampled date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSnapshot {
    pub date: MarketDate,
    pub portfolio_value: f64,
    pub period_return: f64,
    pub cumulative_return: f64,
}

/// Value the fixed share counts across the resampled dates.
///
/// The first snapshot's value is the sum of position values at purchase;
/// every later value is the dot product of that row's prices with the share
/// counts. Share counts never change after purchase. Returns on
/// the first snapshot are exactly zero, and a zero-valued prior snapshot
/// yields a zero period return rather than a division by zero.
pub(crate) fn build_snapshots(
    prices: &ResampledTable,
    positions: &[PortfolioPosition],
) -> Vec<PortfolioSnapshot> {
    let shares_by_column: Vec<f64> = prices
        .symbols()
        .iter()
        .map(|symbol| {
            positions
                .iter()
                .find(|position| &position.symbol == symbol)
                .map(|position| position.purchased_shares as f64)
                .unwrap_or(0.0)
        })
        .collect();

    let initial_value: f64 = positions
        .iter()
        .map(|position| position.position_value)
        .sum();

    let mut snapshots = Vec::with_capacity(prices.row_count());
    let mut growth_factor = 1.0;
    for (index, &date) in prices.dates().iter().enumerate() {
        if index == 0 {
            snapshots.push(PortfolioSnapshot {
                date,
                portfolio_value: initial_value,
                period_return: 0.0,
                cumulative_return: 0.0,
            });
            continue;
        }

        let portfolio_value: f64 = prices
            .row(index)
            .iter()
            .zip(&shares_by_column)
            .map(|(price, shares)| price * shares)
            .sum();

        let prior_value = snapshots[index - 1].portfolio_value;
        let period_return = if prior_value > 0.0 {
            portfolio_value / prior_value - 1.0
        } else {
            0.0
        };
        growth_factor *= 1.0 + period_return;

        snapshots.push(PortfolioSnapshot {
            date,
            portfolio_value,
            period_return,
            cumulative_return: growth_factor - 1.0,
        });
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resample::month_end_resample;
    use pasiva_core::{PriceTable, Symbol};

    fn monthly_prices(cells: Vec<Vec<Option<f64>>>) -> ResampledTable {
        let dates = ["2021-01-29", "2021-02-26", "2021-03-31"];
        let table = PriceTable::new(
            vec![Symbol::parse("AMXL").expect("symbol")],
            dates[..cells.len()]
                .iter()
                .map(|d| MarketDate::parse(d).expect("date"))
                .collect(),
            cells,
        )
        .expect("table");
        month_end_resample(&table).expect("resampled")
    }

    fn position(shares: u64, position_value: f64) -> PortfolioPosition {
        PortfolioPosition {
            symbol: Symbol::parse("AMXL").expect("symbol"),
            capital_allocation: position_value,
            cost_per_share: 1.0,
            purchased_shares: shares,
            position_value,
            commission_paid: 0.0,
            realized_weight: 1.0,
        }
    }

    #[test]
    fn compounds_returns_across_snapshots() {
        let prices = monthly_prices(vec![vec![Some(10.0)], vec![Some(11.0)], vec![Some(9.9)]]);
        let snapshots = build_snapshots(&prices, &[position(10, 100.0)]);

        assert_eq!(snapshots[0].portfolio_value, 100.0);
        assert_eq!(snapshots[0].period_return, 0.0);
        assert!((snapshots[1].portfolio_value - 110.0).abs() < 1e-9);
        assert!((snapshots[1].period_return - 0.10).abs() < 1e-9);
        assert!((snapshots[2].period_return - (-0.10)).abs() < 1e-9);
        // (1.10)(0.90) - 1
        assert!((snapshots[2].cumulative_return - (-0.01)).abs() < 1e-9);
    }

    #[test]
    fn zero_prior_value_produces_zero_return() {
        let prices = monthly_prices(vec![vec![None], vec![Some(11.0)]]);
        let snapshots = build_snapshots(&prices, &[position(0, 0.0)]);

        assert_eq!(snapshots[0].portfolio_value, 0.0);
        assert_eq!(snapshots[1].period_return, 0.0);
        assert_eq!(snapshots[1].cumulative_return, 0.0);
    }
}
