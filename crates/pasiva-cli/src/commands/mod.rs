mod backtest;
mod composition;
mod prices;
mod strategy;

use std::sync::Arc;
use std::time::Instant;

use pasiva_core::{
    Envelope, EnvelopeError, EnvelopeMeta, FetchThrottle, PriceProvider, PriceSource,
    ReqwestHttpClient, SyntheticSource, YahooAdapter,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command, SourceSelector};
use crate::error::CliError;

/// Requests the provider will accept per minute before pacing kicks in.
const PROVIDER_QUOTA_PER_MINUTE: u32 = 30;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let provider = to_provider(cli.source);
    let started = Instant::now();

    let result = match &cli.command {
        Command::Composition(args) => composition::run(args)?,
        Command::Prices(args) => prices::run(args, cli.source).await?,
        Command::Backtest(args) => backtest::run(args, cli.source).await?,
        Command::Strategy(args) => strategy::run(args, cli.source).await?,
    };

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), provider)
        .with_latency(started.elapsed().as_millis() as u64);
    for warning in result.warnings {
        meta.push_warning(warning);
    }

    let mut envelope = Envelope::success(meta, result.data);
    for error in result.errors {
        envelope.push_error(error);
    }

    Ok(envelope)
}

pub(crate) fn to_provider(selector: SourceSelector) -> PriceProvider {
    match selector {
        SourceSelector::Yahoo => PriceProvider::Yahoo,
        SourceSelector::Synthetic => PriceProvider::Synthetic,
    }
}

/// Build the provider adapter plus the throttle that paces it.
pub(crate) fn make_source(
    selector: SourceSelector,
    suffix: &str,
) -> (Arc<dyn PriceSource>, FetchThrottle) {
    let source: Arc<dyn PriceSource> = match selector {
        SourceSelector::Yahoo => Arc::new(
            YahooAdapter::new(Arc::new(ReqwestHttpClient::new())).with_market_suffix(suffix),
        ),
        SourceSelector::Synthetic => Arc::new(SyntheticSource),
    };

    (source, FetchThrottle::per_minute(PROVIDER_QUOTA_PER_MINUTE))
}
