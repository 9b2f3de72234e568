pub mod profitability;
pub mod risk;

pub use profitability::ProfitabilityMetrics;
pub use risk::RiskMetrics;
