//! Core contracts for pasiva.
//!
//! This crate contains:
//! - Canonical domain types and validation (symbols, market dates, price
//!   series, the aligned price table)
//! - Index-composition normalization
//! - The price-source trait, provider adapters, transport, and pacing
//! - The response envelope used by machine-readable output

pub mod adapters;
pub mod composition;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod source;
pub mod table;
pub mod throttle;

pub use adapters::{SyntheticSource, YahooAdapter};
pub use composition::{load_composition, parse_composition, CompositionEntry};
pub use data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};
pub use domain::{MarketDate, PriceHistory, PricePoint, Symbol};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{CompositionError, ValidationError};
pub use fetcher::{fetch_price_table, FetchOutcome};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use source::PriceProvider;
pub use table::PriceTable;
pub use throttle::FetchThrottle;
