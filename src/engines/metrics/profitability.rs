// src/engines/metrics/profitability.rs

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    /// Compounded return: prod(1 + r) - 1
    pub fn cumulative_return(returns: &[f64]) -> f64 {
        returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
    }

    /// Compounded return over the trailing `lookback` periods (all periods if fewer)
    pub fn momentum(returns: &[f64], lookback: usize) -> f64 {
        let start = returns.len().saturating_sub(lookback);
        Self::cumulative_return(&returns[start..])
    }

    /// Realized profit per unit of turnover, NaN when nothing was traded
    pub fn avg_trade_ratio(returns: &[f64], turnover: &[f64]) -> f64 {
        let total_pl: f64 = returns.iter().sum();
        let total_turnover: f64 = turnover.iter().sum();
        if total_turnover == 0.0 {
            return f64::NAN;
        }
        total_pl / total_turnover
    }
}
