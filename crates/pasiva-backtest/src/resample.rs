use pasiva_core::{MarketDate, PriceTable, Symbol};

use crate::BacktestError;

/// Month-end view of a daily price table.
///
/// Rows are the last observed trading day of each month; cells are dense,
/// with gaps carried over as `0.0`, meaning the asset contributes no value
/// on that date. Column order matches the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledTable {
    symbols: Vec<Symbol>,
    dates: Vec<MarketDate>,
    rows: Vec<Vec<f64>>,
}

impl ResampledTable {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn dates(&self) -> &[MarketDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    /// First row, i.e. prices at period start.
    pub fn start_row(&self) -> &[f64] {
        &self.rows[0]
    }
}

/// Reduce a daily table to one observation per calendar month.
///
/// A row survives when its month-of-year differs from the next row's; the
/// final row always survives, having no successor to compare against. The
/// year is deliberately not part of the comparison. Applying this to an
/// already-monthly series keeps every row.
pub fn month_end_resample(prices: &PriceTable) -> Result<ResampledTable, BacktestError> {
    if prices.row_count() == 0 {
        return Err(BacktestError::InsufficientPriceData);
    }

    let dates = prices.dates();
    let mut kept_dates = Vec::new();
    let mut rows = Vec::new();
    for index in 0..dates.len() {
        let month_closes = match dates.get(index + 1) {
            Some(next) => dates[index].month() != next.month(),
            None => true,
        };
        if month_closes {
            kept_dates.push(dates[index]);
            rows.push(
                prices
                    .row(index)
                    .iter()
                    .map(|cell| cell.unwrap_or(0.0))
                    .collect(),
            );
        }
    }

    Ok(ResampledTable {
        symbols: prices.symbols().to_vec(),
        dates: kept_dates,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(dates: &[&str], cells: Vec<Vec<Option<f64>>>) -> PriceTable {
        PriceTable::new(
            vec![Symbol::parse("AMXL").expect("symbol")],
            dates
                .iter()
                .map(|date| MarketDate::parse(date).expect("date"))
                .collect(),
            cells,
        )
        .expect("table")
    }

    #[test]
    fn keeps_last_trading_day_of_each_month() {
        let resampled = month_end_resample(&table(
            &["2021-01-28", "2021-01-29", "2021-02-25", "2021-02-26", "2021-03-15"],
            vec![
                vec![Some(1.0)],
                vec![Some(2.0)],
                vec![Some(3.0)],
                vec![Some(4.0)],
                vec![Some(5.0)],
            ],
        ))
        .expect("resampled");

        let kept: Vec<String> = resampled.dates().iter().map(|d| d.format_iso()).collect();
        assert_eq!(kept, vec!["2021-01-29", "2021-02-26", "2021-03-15"]);
        assert_eq!(resampled.start_row(), &[2.0]);
    }

    #[test]
    fn is_identity_on_monthly_series() {
        let monthly = table(
            &["2021-01-29", "2021-02-26", "2021-03-31"],
            vec![vec![Some(1.0)], vec![Some(2.0)], vec![Some(3.0)]],
        );

        let resampled = month_end_resample(&monthly).expect("resampled");
        assert_eq!(resampled.row_count(), 3);
        assert_eq!(resampled.dates(), monthly.dates());
    }

    #[test]
    fn final_row_is_always_retained() {
        let resampled = month_end_resample(&table(
            &["2021-01-28", "2021-01-29"],
            vec![vec![Some(1.0)], vec![Some(2.0)]],
        ))
        .expect("resampled");

        assert_eq!(resampled.row_count(), 1);
        assert_eq!(resampled.dates()[0].format_iso(), "2021-01-29");
    }

    #[test]
    fn gaps_become_zero_after_selection() {
        let resampled = month_end_resample(&table(
            &["2021-01-29", "2021-02-26"],
            vec![vec![Some(1.0)], vec![None]],
        ))
        .expect("resampled");

        assert_eq!(resampled.row(1), &[0.0]);
    }

    #[test]
    fn empty_table_is_insufficient_data() {
        let err = month_end_resample(&PriceTable::empty()).expect_err("must fail");
        assert!(matches!(err, BacktestError::InsufficientPriceData));
    }
}
