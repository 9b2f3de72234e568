use super::oos::OutOfSampleEvaluator;
use crate::{
    config::{traits::ConfigSection, BacktestConfig},
    data::{DataValidator, ReturnTable, TurnoverTable},
    engines::{
        metrics::{ProfitabilityMetrics, RiskMetrics},
        selection::SelectionParams,
        walkforward::{schedule::add_months, WalkForwardRunner, WalkForwardSchedule},
    },
    error::{Result, WfError},
    functions::{RegisteredScore, ScoringRegistry},
    types::{AggregateResult, DatedSeries, WindowOos, WindowSelection},
};
use chrono::Days;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything one configuration produced: per-window diagnostics plus the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub selections: Vec<WindowSelection>,
    pub oos: Vec<WindowOos>,
    /// `None` when no window produced an OOS result
    pub aggregate: Option<AggregateResult>,
}

/// Schedule + in-sample selection + OOS evaluation + aggregation for one configuration.
pub struct FullBacktester<'a> {
    returns: &'a ReturnTable,
    turnover: Option<&'a TurnoverTable>,
    config: BacktestConfig,
    scorer: RegisteredScore,
    schedule: WalkForwardSchedule,
    params: SelectionParams,
    evaluator: OutOfSampleEvaluator,
}

impl<'a> FullBacktester<'a> {
    pub fn new(
        returns: &'a ReturnTable,
        turnover: Option<&'a TurnoverTable>,
        config: BacktestConfig,
        scorer: RegisteredScore,
    ) -> Result<Self> {
        config.validate()?;
        if let Some(turnover) = turnover {
            DataValidator::validate_turnover(returns, turnover)?;
        }

        let schedule = WalkForwardSchedule::new(
            returns.last_date(),
            config.first_os,
            config.window_length,
            config.step_months,
            config.window_type(),
        )?;

        // Accepted: the first window simply holds whatever rows exist.
        if let Some(first_date) = returns.first_date() {
            let analysis_start = schedule.analysis_start()?;
            if analysis_start < first_date {
                log::warn!(
                    "First in-sample window starts {} but data begins {}; it will be shorter than {} months",
                    analysis_start,
                    first_date,
                    config.window_length
                );
            }
        }

        let params = config.selection_params();
        let evaluator = OutOfSampleEvaluator::new(config.risk_free_rate, config.periods_per_year);

        Ok(Self {
            returns,
            turnover,
            config,
            scorer,
            schedule,
            params,
            evaluator,
        })
    }

    /// Resolve the configuration's scoring function by name first.
    pub fn from_registry(
        returns: &'a ReturnTable,
        turnover: Option<&'a TurnoverTable>,
        config: BacktestConfig,
        registry: &ScoringRegistry,
    ) -> Result<Self> {
        let scorer = registry.resolve(&config.metric_name)?;
        Self::new(returns, turnover, config, scorer)
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn schedule(&self) -> &WalkForwardSchedule {
        &self.schedule
    }

    pub fn run(&self) -> Result<BacktestReport> {
        let selections = self.run_in_sample()?;
        let oos = self.run_oos(&selections)?;
        let aggregate = self.aggregate_oos(&oos);

        Ok(BacktestReport { selections, oos, aggregate })
    }

    pub fn run_in_sample(&self) -> Result<Vec<WindowSelection>> {
        WalkForwardRunner::new(
            self.returns,
            self.turnover,
            &self.schedule,
            &self.params,
            &self.scorer,
        )
        .run()
    }

    /// Evaluate each window's selection on (end + 1 day) ..= (end + step_months).
    /// Windows with no OOS rows or an empty selection are skipped.
    pub fn run_oos(&self, selections: &[WindowSelection]) -> Result<Vec<WindowOos>> {
        let evaluated: Vec<Option<WindowOos>> = selections
            .par_iter()
            .map(|ws| self.evaluate_window(ws))
            .collect::<Result<_>>()?;

        Ok(evaluated.into_iter().flatten().collect())
    }

    fn evaluate_window(&self, ws: &WindowSelection) -> Result<Option<WindowOos>> {
        let end = ws.window.end;
        let oos_start = end.checked_add_days(Days::new(1)).ok_or_else(|| {
            WfError::Computation(format!("Date overflow after {}", end))
        })?;
        let oos_end = add_months(end, self.config.step_months)?;

        let oos_returns = self.returns.slice_dates(oos_start, oos_end);
        if oos_returns.is_empty() {
            log::warn!("Skipping {}: no OOS rows in {} to {}", ws.label(), oos_start, oos_end);
            return Ok(None);
        }
        if ws.selection.filtered.is_empty() {
            log::warn!("Skipping {}: empty selection", ws.label());
            return Ok(None);
        }

        let oos_turnover = self.turnover.map(|t| t.slice_dates(oos_start, oos_end));
        let result = self
            .evaluator
            .evaluate(&oos_returns, oos_turnover.as_ref(), &ws.selection.filtered)?;

        log::debug!(
            "OOS {} to {} ({} assets): cumulative {:.4}, sharpe {:.4}",
            oos_start,
            oos_end,
            ws.selection.filtered.len(),
            result.cumulative_return,
            result.sharpe
        );

        Ok(Some(WindowOos {
            window: ws.window,
            oos_start,
            oos_end,
            result,
        }))
    }

    /// Stitch the OOS series together (date-ordered, first value wins on a
    /// repeated date) and recompute the headline metrics over the whole run.
    pub fn aggregate_oos(&self, oos: &[WindowOos]) -> Option<AggregateResult> {
        aggregate_windows(oos, self.config.risk_free_rate)
    }
}

/// Cross-window aggregation; volatility here is the per-period standard deviation.
pub fn aggregate_windows(oos: &[WindowOos], risk_free_rate: f64) -> Option<AggregateResult> {
    let return_parts: Vec<&DatedSeries> = oos
        .iter()
        .map(|w| &w.result.portfolio_returns)
        .filter(|s| !s.is_empty())
        .collect();
    if return_parts.is_empty() {
        return None;
    }

    let turnover_parts: Vec<&DatedSeries> = oos
        .iter()
        .filter_map(|w| w.result.portfolio_turnover.as_ref())
        .filter(|s| !s.is_empty())
        .collect();

    let full = DatedSeries::concat_sorted(return_parts);
    let values = &full.values;

    let overall_cumulative_return = ProfitabilityMetrics::cumulative_return(values);
    let overall_volatility = RiskMetrics::std_dev(values);
    let overall_sharpe = RiskMetrics::sharpe(values, risk_free_rate);

    let overall_avg_trade = if turnover_parts.is_empty() {
        None
    } else {
        let turnover = DatedSeries::concat_sorted(turnover_parts);
        Some(ProfitabilityMetrics::avg_trade_ratio(values, &turnover.values))
    };

    Some(AggregateResult {
        full_oos_series: full,
        overall_cumulative_return,
        overall_volatility,
        overall_sharpe,
        overall_avg_trade,
        windows: oos.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OosResult, WindowSlice};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window_oos(dates: Vec<NaiveDate>, values: Vec<f64>, turnover: Option<Vec<f64>>) -> WindowOos {
        let first = dates[0];
        let portfolio_turnover = turnover.map(|t| DatedSeries::new(dates.clone(), t));
        WindowOos {
            window: WindowSlice::new(first, first),
            oos_start: first,
            oos_end: first,
            result: OosResult {
                portfolio_returns: DatedSeries::new(dates, values),
                portfolio_turnover,
                cumulative_return: 0.0,
                volatility: 0.0,
                sharpe: 0.0,
                avg_trade: None,
            },
        }
    }

    #[test]
    fn test_aggregate_sorts_and_dedups() {
        let later = window_oos(vec![d(2020, 2, 3), d(2020, 2, 4)], vec![0.02, -0.01], None);
        let earlier = window_oos(vec![d(2020, 1, 2), d(2020, 2, 3)], vec![0.01, 0.5], None);

        let agg = aggregate_windows(&[later, earlier], 0.0).unwrap();
        assert_eq!(agg.full_oos_series.dates, vec![d(2020, 1, 2), d(2020, 2, 3), d(2020, 2, 4)]);
        // first window in input order wins the shared date
        assert_eq!(agg.full_oos_series.values, vec![0.01, 0.02, -0.01]);

        let expected = 1.01 * 1.02 * 0.99 - 1.0;
        assert!((agg.overall_cumulative_return - expected).abs() < 1e-12);
        assert!(agg.overall_avg_trade.is_none());
        assert_eq!(agg.windows, 2);
    }

    #[test]
    fn test_aggregate_avg_trade() {
        let w = window_oos(vec![d(2021, 5, 3), d(2021, 5, 4)], vec![0.02, 0.02], Some(vec![0.1, 0.1]));
        let agg = aggregate_windows(&[w], 0.0).unwrap();
        assert!((agg.overall_avg_trade.unwrap() - 0.2).abs() < 1e-12);
        // flat series
        assert!(agg.overall_sharpe.is_nan());

        let zero = window_oos(vec![d(2021, 5, 3)], vec![0.02], Some(vec![0.0]));
        let agg = aggregate_windows(&[zero], 0.0).unwrap();
        assert!(agg.overall_avg_trade.unwrap().is_nan());
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(aggregate_windows(&[], 0.0).is_none());
    }
}
