use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::{CompositionError, Symbol, ValidationError};

/// Non-equity line items that appear in index composition files but are not
/// investable through the equity price source: bond trackers, USD/MXN cash
/// positions and fixed-income ETF share classes.
pub const EXCLUDED_IDENTIFIERS: [&str; 6] = ["KOFL", "KOFUBL", "USD", "BSMXB", "NMKA", "MXN"];

/// Composition files lead with this many metadata lines before the header.
const METADATA_LINES: usize = 2;

/// One normalized index constituent: ticker plus target weight as a
/// fraction of capital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub symbol: Symbol,
    pub weight: f64,
}

impl CompositionEntry {
    pub fn new(symbol: Symbol, weight: f64) -> Result<Self, ValidationError> {
        if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
            return Err(ValidationError::InvalidWeight { value: weight });
        }
        Ok(Self { symbol, weight })
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "Ticker", alias = "ticker")]
    ticker: Option<String>,
    #[serde(alias = "Peso (%)", alias = "Peso(%)", alias = "Weight (%)")]
    weight_pct: Option<String>,
}

/// Strip `*` markers and map `.` to `-` so share-class tickers match the
/// price source's symbol conventions (`GCARSOA.1` becomes `GCARSOA-1`).
fn clean_ticker(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|ch| *ch != '*')
        .map(|ch| if ch == '.' { '-' } else { ch })
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalize raw composition CSV content into ordered constituent entries.
///
/// Rows missing a ticker or a parseable weight after cleaning are dropped,
/// as are excluded identifiers and weights outside `(0, 100]` percent.
/// Input order is preserved; duplicates are the caller's responsibility.
pub fn parse_composition(content: &str) -> Result<Vec<CompositionEntry>, CompositionError> {
    let body = content
        .lines()
        .skip(METADATA_LINES)
        .collect::<Vec<_>>()
        .join("\n");

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut entries = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        let row = result?;

        let Some(ticker) = row.ticker.as_deref().and_then(clean_ticker) else {
            continue;
        };
        if EXCLUDED_IDENTIFIERS.contains(&ticker.as_str()) {
            continue;
        }
        let Some(weight_pct) = row
            .weight_pct
            .as_deref()
            .and_then(|value| value.trim().parse::<f64>().ok())
        else {
            continue;
        };

        let Ok(symbol) = Symbol::parse(&ticker) else {
            continue;
        };
        let Ok(entry) = CompositionEntry::new(symbol, weight_pct / 100.0) else {
            continue;
        };
        entries.push(entry);
    }

    Ok(entries)
}

/// Read a composition file from disk and normalize it.
///
/// An empty result after cleaning is an error: a period cannot be simulated
/// without constituents.
pub fn load_composition(path: &Path) -> Result<Vec<CompositionEntry>, CompositionError> {
    let content = fs::read_to_string(path).map_err(|source| CompositionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_composition(&content)?;
    if entries.is_empty() {
        return Err(CompositionError::EmptyComposition {
            path: path.to_path_buf(),
        });
    }

    Ok(entries)
}
