//! Passive index-replication portfolio simulator.
//!
//! This crate contains:
//! - Delisting detection over the daily price table
//! - Month-end resampling into a dense grid
//! - Whole-share position sizing under a commission markup
//! - Cash reconciliation with forced-sale liquidation
//! - The performance time series and global summary
//! - A multi-period strategy runner over the core pipeline

pub mod delisting;
pub mod error;
pub mod performance;
pub mod portfolio;
pub mod resample;
pub mod runner;
pub mod simulation;

pub use delisting::{detect_delistings, DelistingRecord};
pub use error::BacktestError;
pub use performance::PortfolioSnapshot;
pub use portfolio::PortfolioPosition;
pub use resample::{month_end_resample, ResampledTable};
pub use runner::{run_period, run_strategy, PeriodFailure, PeriodSpec, StrategyRun};
pub use simulation::{simulate, GlobalSummary, SimulationReport};
