mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let envelope = commands::run(&cli).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    Ok(())
}
