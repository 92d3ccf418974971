use pasiva_core::load_composition;

use crate::cli::CompositionArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &CompositionArgs) -> Result<CommandResult, CliError> {
    let entries = load_composition(&args.file)?;
    Ok(CommandResult::ok(serde_json::to_value(entries)?))
}
