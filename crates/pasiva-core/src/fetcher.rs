use std::collections::{BTreeSet, HashMap};

use crate::data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};
use crate::throttle::FetchThrottle;
use crate::{MarketDate, PriceHistory, PriceTable, Symbol};

/// Assembled price table plus the data-quality notes gathered on the way.
#[derive(Debug)]
pub struct FetchOutcome {
    pub table: PriceTable,
    pub warnings: Vec<String>,
}

/// Fetch each symbol's daily adjusted-close history and align the results
/// into one date-indexed table.
///
/// Symbols the provider does not know, and symbols whose whole series is
/// missing, are dropped with a warning rather than failing the fetch; any
/// other provider error aborts. Dates the provider never reported stay
/// `None` in the grid; absence is preserved, not zero-filled.
pub async fn fetch_price_table(
    source: &dyn PriceSource,
    symbols: &[Symbol],
    start: MarketDate,
    end: MarketDate,
    throttle: &FetchThrottle,
) -> Result<FetchOutcome, SourceError> {
    let mut histories: Vec<PriceHistory> = Vec::with_capacity(symbols.len());
    let mut warnings = Vec::new();

    for symbol in symbols {
        throttle.acquire().await;
        let request = HistoryRequest::new(symbol.clone(), start, end)?;

        match source.daily_history(&request).await {
            Ok(history) if history.is_all_missing() => {
                warnings.push(format!("{symbol}: no price data in range, dropped"));
            }
            Ok(history) => histories.push(history),
            Err(error) if error.kind() == SourceErrorKind::UnknownSymbol => {
                warnings.push(format!("{symbol}: unknown to provider, dropped"));
            }
            Err(error) => return Err(error),
        }
    }

    let table = align_histories(&histories).map_err(|error| SourceError::internal(error.to_string()))?;
    Ok(FetchOutcome { table, warnings })
}

fn align_histories(histories: &[PriceHistory]) -> Result<PriceTable, crate::ValidationError> {
    let mut observed: BTreeSet<MarketDate> = BTreeSet::new();
    for history in histories {
        for point in &history.points {
            observed.insert(point.date);
        }
    }

    let dates: Vec<MarketDate> = observed.into_iter().collect();
    let row_of: HashMap<MarketDate, usize> = dates
        .iter()
        .enumerate()
        .map(|(index, date)| (*date, index))
        .collect();

    let mut cells = vec![vec![None; histories.len()]; dates.len()];
    for (column, history) in histories.iter().enumerate() {
        for point in &history.points {
            cells[row_of[&point.date]][column] = point.adj_close;
        }
    }

    let symbols = histories
        .iter()
        .map(|history| history.symbol.clone())
        .collect();
    PriceTable::new(symbols, dates, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricePoint;

    fn history(symbol: &str, points: &[(&str, Option<f64>)]) -> PriceHistory {
        PriceHistory::new(
            Symbol::parse(symbol).expect("symbol"),
            points
                .iter()
                .map(|(date, price)| PricePoint {
                    date: MarketDate::parse(date).expect("date"),
                    adj_close: *price,
                })
                .collect(),
        )
        .expect("history")
    }

    #[test]
    fn aligns_partial_coverage_onto_date_union() {
        let table = align_histories(&[
            history("AMXL", &[("2021-01-04", Some(14.5)), ("2021-01-05", Some(14.6))]),
            history("WALMEX", &[("2021-01-05", Some(56.0)), ("2021-01-06", Some(56.4))]),
        ])
        .expect("aligned table");

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.row(0), &[Some(14.5), None]);
        assert_eq!(table.row(1), &[Some(14.6), Some(56.0)]);
        assert_eq!(table.row(2), &[None, Some(56.4)]);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = align_histories(&[]).expect("empty table");
        assert!(table.is_empty());
        assert_eq!(table.symbol_count(), 0);
    }
}
