use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{MarketDate, PriceHistory, PriceProvider, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    UnknownSymbol,
    Internal,
}

/// Structured provider error surfaced by price-source adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unknown_symbol(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::UnknownSymbol,
            message: format!("symbol '{symbol}' is unknown to the provider"),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::UnknownSymbol => "source.unknown_symbol",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request for one ticker's daily adjusted-close history over a closed
/// date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub start: MarketDate,
    pub end: MarketDate,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, start: MarketDate, end: MarketDate) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(format!(
                "history range start {start} is after end {end}"
            )));
        }
        Ok(Self { symbol, start, end })
    }
}

/// Price-source adapter contract.
///
/// Implementations fetch one symbol at a time; assembling histories into an
/// aligned table is the fetcher's job, not the adapter's.
pub trait PriceSource: Send + Sync {
    fn id(&self) -> PriceProvider;

    fn daily_history<'a>(
        &'a self,
        req: &'a HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceHistory, SourceError>> + Send + 'a>>;
}
