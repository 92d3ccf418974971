use serde::Serialize;

use crate::{MarketDate, Symbol, ValidationError};

/// Date-by-ticker grid of daily adjusted closing prices.
///
/// This is the explicit replacement for label-aligned dataframe tables:
/// `symbols` fixes the column order, `dates` is a strictly-ascending index,
/// and `cells` is row-major with one `Option<f64>` per (date, symbol).
/// Alignment is validated at construction; consumers iterate by index and
/// never align by label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    symbols: Vec<Symbol>,
    dates: Vec<MarketDate>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    pub fn new(
        symbols: Vec<Symbol>,
        dates: Vec<MarketDate>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, ValidationError> {
        for (index, symbol) in symbols.iter().enumerate() {
            if symbols[..index].contains(symbol) {
                return Err(ValidationError::DuplicateSymbol {
                    symbol: symbol.as_str().to_owned(),
                });
            }
        }

        for (index, window) in dates.windows(2).enumerate() {
            if window[0] >= window[1] {
                return Err(ValidationError::UnsortedDates { index: index + 1 });
            }
        }

        if cells.len() != dates.len() {
            return Err(ValidationError::RowCountMismatch {
                expected: dates.len(),
                actual: cells.len(),
            });
        }

        for (row, cells_row) in cells.iter().enumerate() {
            if cells_row.len() != symbols.len() {
                return Err(ValidationError::RowWidthMismatch {
                    row,
                    expected: symbols.len(),
                    actual: cells_row.len(),
                });
            }
            for (col, cell) in cells_row.iter().enumerate() {
                if let Some(price) = cell {
                    if !price.is_finite() || *price < 0.0 {
                        return Err(ValidationError::InvalidPrice {
                            symbol: symbols[col].as_str().to_owned(),
                            date: dates[row].format_iso(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            symbols,
            dates,
            cells,
        })
    }

    /// Table with no observations at all.
    pub fn empty() -> Self {
        Self {
            symbols: Vec::new(),
            dates: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn dates(&self) -> &[MarketDate] {
        &self.dates
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, index: usize) -> &[Option<f64>] {
        &self.cells[index]
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells[row][column]
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.cells.iter().map(move |row| row[index])
    }

    pub fn column_index(&self, symbol: &Symbol) -> Option<usize> {
        self.symbols.iter().position(|candidate| candidate == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(input: &str) -> Symbol {
        Symbol::parse(input).expect("test symbol")
    }

    fn date(input: &str) -> MarketDate {
        MarketDate::parse(input).expect("test date")
    }

    #[test]
    fn builds_aligned_table() {
        let table = PriceTable::new(
            vec![symbol("AMXL"), symbol("WALMEX")],
            vec![date("2021-01-04"), date("2021-01-05")],
            vec![
                vec![Some(14.5), Some(56.1)],
                vec![None, Some(56.9)],
            ],
        )
        .expect("table should build");

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 0), None);
        assert_eq!(table.column_index(&symbol("WALMEX")), Some(1));
        assert_eq!(table.column(1).collect::<Vec<_>>(), vec![Some(56.1), Some(56.9)]);
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let err = PriceTable::new(
            vec![symbol("AMXL"), symbol("AMXL")],
            vec![],
            vec![],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::DuplicateSymbol { .. }));
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = PriceTable::new(
            vec![symbol("AMXL")],
            vec![date("2021-01-05"), date("2021-01-04")],
            vec![vec![Some(1.0)], vec![Some(1.0)]],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::UnsortedDates { .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = PriceTable::new(
            vec![symbol("AMXL"), symbol("WALMEX")],
            vec![date("2021-01-04")],
            vec![vec![Some(14.5)]],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::RowWidthMismatch { .. }));
    }

    #[test]
    fn rejects_negative_prices() {
        let err = PriceTable::new(
            vec![symbol("AMXL")],
            vec![date("2021-01-04")],
            vec![vec![Some(-0.5)]],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidPrice { .. }));
    }
}
