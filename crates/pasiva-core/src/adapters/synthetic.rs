use std::future::Future;
use std::pin::Pin;

use time::Weekday;

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::{MarketDate, PriceHistory, PricePoint, PriceProvider, Symbol};

/// Deterministic offline provider.
///
/// Emits a gapless weekday series per symbol, seeded from the symbol bytes,
/// so demos and tests run without network access and always reproduce the
/// same prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSource;

impl SyntheticSource {
    fn history(&self, req: &HistoryRequest) -> Result<PriceHistory, SourceError> {
        let seed = symbol_seed(&req.symbol);
        let base = 40.0 + (seed % 400) as f64 / 10.0;

        let mut points = Vec::new();
        let mut date = req.start.into_inner();
        let mut session = 0u64;
        while MarketDate::from_date(date) <= req.end {
            if !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
                let drift = session as f64 * 0.015;
                let wobble = (seed.wrapping_add(session.wrapping_mul(7)) % 120) as f64 / 100.0 - 0.6;
                points.push(PricePoint {
                    date: MarketDate::from_date(date),
                    adj_close: Some(base + drift + wobble),
                });
                session += 1;
            }
            match date.next_day() {
                Some(next) => date = next,
                None => break,
            }
        }

        PriceHistory::new(req.symbol.clone(), points)
            .map_err(|error| SourceError::internal(error.to_string()))
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> PriceProvider {
        PriceProvider::Synthetic
    }

    fn daily_history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.history(req) })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(symbol: &str) -> HistoryRequest {
        HistoryRequest::new(
            Symbol::parse(symbol).expect("symbol"),
            MarketDate::parse("2021-01-04").expect("date"),
            MarketDate::parse("2021-01-15").expect("date"),
        )
        .expect("request")
    }

    #[test]
    fn emits_positive_weekday_prices() {
        let history = SyntheticSource.history(&request("WALMEX")).expect("history");

        // Two full weeks, weekends excluded.
        assert_eq!(history.points.len(), 10);
        for point in &history.points {
            let price = point.adj_close.expect("synthetic series has no gaps");
            assert!(price > 0.0);
        }
    }

    #[test]
    fn is_deterministic_per_symbol() {
        let first = SyntheticSource.history(&request("AMXL")).expect("history");
        let second = SyntheticSource.history(&request("AMXL")).expect("history");
        let other = SyntheticSource.history(&request("WALMEX")).expect("history");

        assert_eq!(first, second);
        assert_ne!(first.points[0].adj_close, other.points[0].adj_close);
    }
}
