use pasiva_backtest::{run_strategy, PeriodSpec};
use pasiva_core::{EnvelopeError, MarketDate};
use serde_json::json;

use crate::cli::{SourceSelector, StrategyArgs};
use crate::error::CliError;

use super::{make_source, CommandResult};

pub async fn run(args: &StrategyArgs, selector: SourceSelector) -> Result<CommandResult, CliError> {
    let periods = args
        .periods
        .iter()
        .map(|raw| parse_period(args, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let (source, throttle) = make_source(selector, &args.suffix);
    let run = run_strategy(
        source.as_ref(),
        &throttle,
        &periods,
        args.capital,
        args.commission,
    )
    .await;

    let errors = run
        .failures
        .iter()
        .map(|failure| {
            EnvelopeError::new(
                "strategy.period_failed",
                format!("{}: {}", failure.start, failure.error),
            )
        })
        .collect();

    Ok(CommandResult::ok(json!({ "outcomes": run.outcomes })).with_errors(errors))
}

fn parse_period(args: &StrategyArgs, raw: &str) -> Result<PeriodSpec, CliError> {
    let Some((start, end)) = raw.split_once(':') else {
        return Err(CliError::Command(format!(
            "period '{raw}' must be START:END"
        )));
    };

    let start = MarketDate::parse(start)?;
    let end = MarketDate::parse(end)?;
    if end < start {
        return Err(CliError::Command(format!(
            "period '{raw}' ends before it starts"
        )));
    }

    let file_name = format!("{}_{}.csv", args.prefix, start.compact());
    Ok(PeriodSpec {
        composition_path: args.compositions_dir.join(file_name),
        start,
        end,
    })
}
