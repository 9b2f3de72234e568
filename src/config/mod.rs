pub mod backtesting;
pub mod grid;
pub mod manager;
pub mod traits;

pub use backtesting::BacktestConfig;
pub use grid::ConfigGrid;
pub use manager::{AppConfig, ConfigManager, DataConfig};
pub use traits::ConfigSection;
