use thiserror::Error;

/// Errors raised by the portfolio simulator and the strategy runner.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("initial capital must be positive: {value}")]
    InvalidCapital { value: f64 },

    #[error("commission rate must be in [0, 1): {value}")]
    InvalidCommission { value: f64 },

    #[error("price table has no rows, nothing to simulate")]
    InsufficientPriceData,

    #[error(transparent)]
    Composition(#[from] pasiva_core::CompositionError),

    #[error(transparent)]
    Source(#[from] pasiva_core::SourceError),
}
