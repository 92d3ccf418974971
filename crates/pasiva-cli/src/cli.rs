use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Passive index-replication backtesting toolkit.
#[derive(Debug, Parser)]
#[command(name = "pasiva", version, about)]
pub struct Cli {
    /// Output format for command results.
    #[arg(long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Price provider to query.
    #[arg(long, value_enum, default_value = "yahoo", global = true)]
    pub source: SourceSelector,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    Yahoo,
    Synthetic,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize an index-composition file into tickers and weights.
    Composition(CompositionArgs),
    /// Fetch and align daily adjusted closes for a composition's tickers.
    Prices(PricesArgs),
    /// Simulate one period of the passive strategy.
    Backtest(BacktestArgs),
    /// Replay the passive strategy over several historical periods.
    Strategy(StrategyArgs),
}

#[derive(Debug, Args)]
pub struct CompositionArgs {
    /// Index-composition CSV file.
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// Index-composition CSV file naming the tickers to fetch.
    #[arg(long)]
    pub file: PathBuf,

    /// Range start, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub start: String,

    /// Range end, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub end: String,

    /// Market suffix appended to each ticker when querying the provider.
    #[arg(long, default_value = ".MX")]
    pub suffix: String,
}

#[derive(Debug, Args)]
pub struct BacktestArgs {
    /// Index-composition CSV file for the period start.
    #[arg(long)]
    pub file: PathBuf,

    /// Period start, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub start: String,

    /// Period end, YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub end: String,

    /// Initial capital.
    #[arg(long)]
    pub capital: f64,

    /// Per-transaction commission rate as a fraction (e.g. 0.00125).
    #[arg(long, default_value_t = 0.00125)]
    pub commission: f64,

    /// Market suffix appended to each ticker when querying the provider.
    #[arg(long, default_value = ".MX")]
    pub suffix: String,
}

#[derive(Debug, Args)]
pub struct StrategyArgs {
    /// Directory holding one composition file per period.
    #[arg(long)]
    pub compositions_dir: PathBuf,

    /// Composition file prefix; files resolve as `<prefix>_<YYYYMMDD>.csv`
    /// from each period's start date.
    #[arg(long, default_value = "NAFTRAC")]
    pub prefix: String,

    /// Period as START:END (both YYYY-MM-DD); repeatable.
    #[arg(long = "period", value_name = "START:END", required = true)]
    pub periods: Vec<String>,

    /// Initial capital per period.
    #[arg(long)]
    pub capital: f64,

    /// Per-transaction commission rate as a fraction.
    #[arg(long, default_value_t = 0.00125)]
    pub commission: f64,

    /// Market suffix appended to each ticker when querying the provider.
    #[arg(long, default_value = ".MX")]
    pub suffix: String,
}
