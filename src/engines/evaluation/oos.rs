use super::portfolio::EqualWeightPortfolio;
use crate::data::{ReturnTable, TurnoverTable};
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::error::Result;
use crate::types::OosResult;

/// Trading periods per year used to annualize daily volatility
pub const TRADING_DAYS: f64 = 252.0;

/// Realized performance of an equal-weight basket over an out-of-sample slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfSampleEvaluator {
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Default for OutOfSampleEvaluator {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: TRADING_DAYS,
        }
    }
}

impl OutOfSampleEvaluator {
    pub fn new(risk_free_rate: f64, periods_per_year: f64) -> Self {
        Self { risk_free_rate, periods_per_year }
    }

    /// `returns`/`turnover` are already sliced to the OOS period; `selected`
    /// comes from the preceding in-sample window.
    pub fn evaluate(
        &self,
        returns: &ReturnTable,
        turnover: Option<&TurnoverTable>,
        selected: &[String],
    ) -> Result<OosResult> {
        let portfolio = EqualWeightPortfolio::new(selected);
        let portfolio_returns = portfolio.series(returns)?;
        let r = &portfolio_returns.values;

        let cumulative_return = ProfitabilityMetrics::cumulative_return(r);
        let volatility = RiskMetrics::annualized_volatility(r, self.periods_per_year);
        // per-period Sharpe, not annualized
        let sharpe = RiskMetrics::sharpe(r, self.risk_free_rate);

        let (portfolio_turnover, avg_trade) = match turnover {
            Some(t) => {
                let series = portfolio.series(t)?;
                let ratio = ProfitabilityMetrics::avg_trade_ratio(r, &series.values);
                (Some(series), Some(ratio))
            }
            None => (None, None),
        };

        Ok(OosResult {
            portfolio_returns,
            portfolio_turnover,
            cumulative_return,
            volatility,
            sharpe,
            avg_trade,
        })
    }
}
