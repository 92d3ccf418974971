use serde::Serialize;

use pasiva_core::{CompositionEntry, PriceTable};

use crate::delisting::detect_delistings;
use crate::performance::{build_snapshots, PortfolioSnapshot};
use crate::portfolio::{reconcile_cash, size_positions, PortfolioPosition};
use crate::resample::month_end_resample;
use crate::BacktestError;

/// Scalar summary of one simulated period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub initial_value: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub cash: f64,
    pub total_capital: f64,
}

/// Everything one `simulate` call produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub positions: Vec<PortfolioPosition>,
    pub snapshots: Vec<PortfolioSnapshot>,
    pub summary: GlobalSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Simulate buying a whole-share portfolio that approximates the target
/// weights at period start, then holding it across the period.
///
/// The daily table is scanned for delistings first, then reduced to a
/// month-end cadence; positions are sized off the first resampled row and
/// never change afterwards. The input table is only read; the resampled
/// view is a derived copy.
pub fn simulate(
    weights: &[CompositionEntry],
    prices: &PriceTable,
    capital: f64,
    commission_rate: f64,
) -> Result<SimulationReport, BacktestError> {
    if !capital.is_finite() || capital <= 0.0 {
        return Err(BacktestError::InvalidCapital { value: capital });
    }
    if !commission_rate.is_finite() || !(0.0..1.0).contains(&commission_rate) {
        return Err(BacktestError::InvalidCommission {
            value: commission_rate,
        });
    }

    let delistings = detect_delistings(prices);
    let resampled = month_end_resample(prices)?;
    let positions = size_positions(weights, &resampled, capital, commission_rate);
    let (cash, warnings) = reconcile_cash(&positions, &delistings, capital, commission_rate);
    let snapshots = build_snapshots(&resampled, &positions);

    let initial_value = snapshots.first().map_or(0.0, |s| s.portfolio_value);
    let final_value = snapshots.last().map_or(0.0, |s| s.portfolio_value);
    let total_return_pct = snapshots.last().map_or(0.0, |s| s.cumulative_return) * 100.0;

    Ok(SimulationReport {
        positions,
        snapshots,
        summary: GlobalSummary {
            initial_value,
            final_value,
            total_return_pct,
            cash,
            total_capital: cash + final_value,
        },
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasiva_core::{MarketDate, Symbol};

    fn entry(symbol: &str, weight: f64) -> CompositionEntry {
        CompositionEntry::new(Symbol::parse(symbol).expect("symbol"), weight).expect("entry")
    }

    fn two_month_table() -> PriceTable {
        PriceTable::new(
            vec![Symbol::parse("AMXL").expect("symbol")],
            vec![
                MarketDate::parse("2021-01-29").expect("date"),
                MarketDate::parse("2021-02-26").expect("date"),
            ],
            vec![vec![Some(100.0)], vec![Some(110.0)]],
        )
        .expect("table")
    }

    #[test]
    fn rejects_non_positive_capital() {
        let err = simulate(&[entry("AMXL", 0.5)], &two_month_table(), 0.0, 0.01)
            .expect_err("must fail");
        assert!(matches!(err, BacktestError::InvalidCapital { .. }));
    }

    #[test]
    fn rejects_commission_outside_unit_interval() {
        let err = simulate(&[entry("AMXL", 0.5)], &two_month_table(), 1_000.0, 1.0)
            .expect_err("must fail");
        assert!(matches!(err, BacktestError::InvalidCommission { .. }));

        let err = simulate(&[entry("AMXL", 0.5)], &two_month_table(), 1_000.0, -0.01)
            .expect_err("must fail");
        assert!(matches!(err, BacktestError::InvalidCommission { .. }));
    }

    #[test]
    fn empty_table_aborts_before_sizing() {
        let err = simulate(&[entry("AMXL", 0.5)], &PriceTable::empty(), 1_000.0, 0.01)
            .expect_err("must fail");
        assert!(matches!(err, BacktestError::InsufficientPriceData));
    }

    #[test]
    fn total_capital_is_cash_plus_final_value() {
        let report = simulate(&[entry("AMXL", 0.6)], &two_month_table(), 1_000.0, 0.01)
            .expect("simulation");

        assert_eq!(
            report.summary.total_capital,
            report.summary.cash + report.summary.final_value
        );
    }
}
