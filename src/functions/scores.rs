use super::traits::{ScoreArgs, ScoringFunction};
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::error::{Result, WfError};

/// Lookback (in periods) used by momentum and the composite score
pub const MOMENTUM_LOOKBACK: usize = 12;

pub struct Sharpe;

impl ScoringFunction for Sharpe {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        let rf = args.risk_free_rate();
        Ok(args.returns().iter().map(|col| sharpe_or_zero(col, rf)).collect())
    }
}

pub struct HighestReturn;

impl ScoringFunction for HighestReturn {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        Ok(args.returns().iter().map(|col| col.iter().sum()).collect())
    }
}

pub struct MaxDrawdown;

impl ScoringFunction for MaxDrawdown {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        Ok(args.returns().iter().map(|col| RiskMetrics::max_drawdown(col)).collect())
    }
}

pub struct Volatility;

impl ScoringFunction for Volatility {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        Ok(args.returns().iter().map(|col| RiskMetrics::std_dev(col)).collect())
    }
}

pub struct Momentum {
    pub lookback: usize,
}

impl Default for Momentum {
    fn default() -> Self {
        Self { lookback: MOMENTUM_LOOKBACK }
    }
}

impl ScoringFunction for Momentum {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        Ok(args
            .returns()
            .iter()
            .map(|col| ProfitabilityMetrics::momentum(col, self.lookback))
            .collect())
    }
}

pub struct AvgTrade;

impl ScoringFunction for AvgTrade {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        let turnover = args.turnover().ok_or_else(|| {
            WfError::Configuration("avg_trade scoring requires turnover data".to_string())
        })?;
        let returns = args.returns();
        if turnover.len() != returns.len() {
            return Err(WfError::Computation(format!(
                "Turnover has {} columns, returns have {}",
                turnover.len(),
                returns.len()
            )));
        }

        Ok(returns
            .iter()
            .zip(turnover.iter())
            .map(|(r, t)| ProfitabilityMetrics::avg_trade_ratio(r, t))
            .collect())
    }
}

/// Weighted blend of Sharpe and momentum
pub struct Composite {
    pub weight_sharpe: f64,
    pub weight_momentum: f64,
    pub momentum_lookback: usize,
}

impl Default for Composite {
    fn default() -> Self {
        Self {
            weight_sharpe: 0.7,
            weight_momentum: 0.3,
            momentum_lookback: MOMENTUM_LOOKBACK,
        }
    }
}

impl ScoringFunction for Composite {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        let rf = args.risk_free_rate();
        Ok(args
            .returns()
            .iter()
            .map(|col| {
                let sharpe = sharpe_or_zero(col, rf);
                let momentum = ProfitabilityMetrics::momentum(col, self.momentum_lookback);
                self.weight_sharpe * sharpe + self.weight_momentum * momentum
            })
            .collect())
    }
}

// Flat columns score 0 rather than NaN so they still rank.
fn sharpe_or_zero(col: &[f64], rf: f64) -> f64 {
    let std = RiskMetrics::std_dev(col);
    if std > 0.0 {
        (RiskMetrics::mean(col) - rf) / std
    } else {
        0.0
    }
}
