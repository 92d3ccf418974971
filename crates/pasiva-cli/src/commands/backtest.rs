use pasiva_backtest::run_period;
use pasiva_backtest::PeriodSpec;
use pasiva_core::MarketDate;

use crate::cli::{BacktestArgs, SourceSelector};
use crate::error::CliError;

use super::{make_source, CommandResult};

pub async fn run(args: &BacktestArgs, selector: SourceSelector) -> Result<CommandResult, CliError> {
    let start = MarketDate::parse(&args.start)?;
    let end = MarketDate::parse(&args.end)?;
    if end < start {
        return Err(CliError::Command(String::from(
            "--end must not precede --start",
        )));
    }

    let period = PeriodSpec {
        composition_path: args.file.clone(),
        start,
        end,
    };

    let (source, throttle) = make_source(selector, &args.suffix);
    let mut report = run_period(
        source.as_ref(),
        &throttle,
        &period,
        args.capital,
        args.commission,
    )
    .await?;

    let warnings = std::mem::take(&mut report.warnings);
    Ok(CommandResult::ok(serde_json::to_value(&report)?).with_warnings(warnings))
}
