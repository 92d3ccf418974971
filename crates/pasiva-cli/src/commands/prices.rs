use pasiva_core::{fetch_price_table, load_composition, MarketDate, Symbol};

use crate::cli::{PricesArgs, SourceSelector};
use crate::error::CliError;

use super::{make_source, CommandResult};

pub async fn run(args: &PricesArgs, selector: SourceSelector) -> Result<CommandResult, CliError> {
    let start = MarketDate::parse(&args.start)?;
    let end = MarketDate::parse(&args.end)?;
    if end < start {
        return Err(CliError::Command(String::from(
            "--end must not precede --start",
        )));
    }

    let entries = load_composition(&args.file)?;
    let symbols: Vec<Symbol> = entries.into_iter().map(|entry| entry.symbol).collect();

    let (source, throttle) = make_source(selector, &args.suffix);
    let fetched = fetch_price_table(source.as_ref(), &symbols, start, end, &throttle).await?;

    Ok(CommandResult::ok(serde_json::to_value(&fetched.table)?).with_warnings(fetched.warnings))
}
