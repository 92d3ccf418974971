use std::collections::BTreeMap;
use std::path::PathBuf;

use pasiva_core::{
    fetch_price_table, load_composition, FetchThrottle, MarketDate, PriceSource, Symbol,
};

use crate::simulation::{simulate, SimulationReport};
use crate::BacktestError;

/// One historical period to replay: which composition snapshot to buy and
/// the date range to hold it over.
#[derive(Debug, Clone)]
pub struct PeriodSpec {
    pub composition_path: PathBuf,
    pub start: MarketDate,
    pub end: MarketDate,
}

/// A period that could not be simulated. The failed period contributes no
/// outcome entry; the others are unaffected.
#[derive(Debug)]
pub struct PeriodFailure {
    pub start: MarketDate,
    pub error: BacktestError,
}

/// Results of replaying the strategy over several periods, keyed by period
/// start date.
#[derive(Debug, Default)]
pub struct StrategyRun {
    pub outcomes: BTreeMap<MarketDate, SimulationReport>,
    pub failures: Vec<PeriodFailure>,
}

/// Replay the full pipeline (composition, prices, simulation) once per
/// period.
///
/// Periods are independent of one another; this runner executes them
/// sequentially, and callers that want concurrency can fan out one
/// `run_period` per task instead.
pub async fn run_strategy(
    source: &dyn PriceSource,
    throttle: &FetchThrottle,
    periods: &[PeriodSpec],
    capital: f64,
    commission_rate: f64,
) -> StrategyRun {
    let mut run = StrategyRun::default();

    for period in periods {
        match run_period(source, throttle, period, capital, commission_rate).await {
            Ok(report) => {
                run.outcomes.insert(period.start, report);
            }
            Err(error) => run.failures.push(PeriodFailure {
                start: period.start,
                error,
            }),
        }
    }

    run
}

/// Simulate a single period end to end.
pub async fn run_period(
    source: &dyn PriceSource,
    throttle: &FetchThrottle,
    period: &PeriodSpec,
    capital: f64,
    commission_rate: f64,
) -> Result<SimulationReport, BacktestError> {
    let entries = load_composition(&period.composition_path)?;
    let symbols: Vec<Symbol> = entries.iter().map(|entry| entry.symbol.clone()).collect();

    let fetched = fetch_price_table(source, &symbols, period.start, period.end, throttle).await?;

    let mut report = simulate(&entries, &fetched.table, capital, commission_rate)?;
    let mut warnings = fetched.warnings;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;

    Ok(report)
}
