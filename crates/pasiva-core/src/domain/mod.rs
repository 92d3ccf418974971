mod date;
mod symbol;

pub use date::MarketDate;
pub use symbol::Symbol;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One daily observation of an adjusted closing price.
///
/// `adj_close` is `None` on dates where the asset did not trade (not yet
/// listed, suspended, delisted); absence is never encoded as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: MarketDate,
    pub adj_close: Option<f64>,
}

/// A single ticker's daily adjusted-close series, ascending by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for (index, window) in points.windows(2).enumerate() {
            if window[0].date >= window[1].date {
                return Err(ValidationError::UnsortedDates { index: index + 1 });
            }
        }
        for point in &points {
            if let Some(price) = point.adj_close {
                if !price.is_finite() || price < 0.0 {
                    return Err(ValidationError::InvalidPrice {
                        symbol: symbol.as_str().to_owned(),
                        date: point.date.format_iso(),
                    });
                }
            }
        }

        Ok(Self { symbol, points })
    }

    /// True when the provider returned no usable observation at all.
    pub fn is_all_missing(&self) -> bool {
        self.points.iter().all(|point| point.adj_close.is_none())
    }
}
