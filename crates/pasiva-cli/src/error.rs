use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] pasiva_core::ValidationError),

    #[error(transparent)]
    Composition(#[from] pasiva_core::CompositionError),

    #[error(transparent)]
    Source(#[from] pasiva_core::SourceError),

    #[error(transparent)]
    Backtest(#[from] pasiva_backtest::BacktestError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Composition(_) => 2,
            Self::Source(_) | Self::Backtest(_) => 3,
            Self::Command(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
