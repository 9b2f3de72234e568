pub mod backtester;
pub mod ensemble;
pub mod oos;
pub mod portfolio;

pub use backtester::{aggregate_windows, BacktestReport, FullBacktester};
pub use ensemble::{EnsembleResults, EnsembleRunner};
pub use oos::{OutOfSampleEvaluator, TRADING_DAYS};
pub use portfolio::EqualWeightPortfolio;
