use super::backtester::FullBacktester;
use crate::{
    config::BacktestConfig,
    data::{ReturnTable, TurnoverTable},
    error::{Result, WfError},
    functions::ScoringRegistry,
    types::AggregateResult,
};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Outcome of an ensemble: aggregates for the configurations that ran,
/// errors for the ones that did not.
#[derive(Debug, Default)]
pub struct EnsembleResults {
    /// `None` means the configuration ran but produced no OOS window
    pub results: BTreeMap<String, Option<AggregateResult>>,
    pub failures: BTreeMap<String, WfError>,
}

impl EnsembleResults {
    pub fn len(&self) -> usize {
        self.results.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.failures.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&Option<AggregateResult>> {
        self.results.get(label)
    }
}

/// Runs one independent FullBacktester per configuration.
pub struct EnsembleRunner<'a> {
    returns: &'a ReturnTable,
    turnover: Option<&'a TurnoverTable>,
    registry: &'a ScoringRegistry,
}

impl<'a> EnsembleRunner<'a> {
    pub fn new(
        returns: &'a ReturnTable,
        turnover: Option<&'a TurnoverTable>,
        registry: &'a ScoringRegistry,
    ) -> Self {
        Self { returns, turnover, registry }
    }

    pub fn run(&self, configs: &[BacktestConfig]) -> EnsembleResults {
        log::info!("Running ensemble of {} configurations", configs.len());

        let outcomes: Vec<(String, Result<Option<AggregateResult>>)> = configs
            .par_iter()
            .map(|config| (config.label(), self.run_one(config)))
            .collect();

        // Sequential merge keeps "later configuration wins" deterministic.
        let mut ensemble = EnsembleResults::default();
        for (label, outcome) in outcomes {
            if ensemble.results.contains_key(&label) || ensemble.failures.contains_key(&label) {
                log::warn!("Duplicate configuration label {}; keeping the later one", label);
                ensemble.results.remove(&label);
                ensemble.failures.remove(&label);
            }

            match outcome {
                Ok(aggregate) => {
                    ensemble.results.insert(label, aggregate);
                }
                Err(e) => {
                    log::error!("Configuration {} failed: {}", label, e);
                    ensemble.failures.insert(label, e);
                }
            }
        }

        log::info!(
            "Ensemble finished: {} succeeded, {} failed",
            ensemble.results.len(),
            ensemble.failures.len()
        );
        ensemble
    }

    fn run_one(&self, config: &BacktestConfig) -> Result<Option<AggregateResult>> {
        let label = config.label();
        log::info!("Starting {}", label);

        let backtester =
            FullBacktester::from_registry(self.returns, self.turnover, config.clone(), self.registry)?;
        let report = backtester.run()?;

        match &report.aggregate {
            Some(agg) => log::info!(
                "Finished {}: {} OOS windows, cumulative {:.4}, sharpe {:.4}",
                label,
                agg.windows,
                agg.overall_cumulative_return,
                agg.overall_sharpe
            ),
            None => log::info!("Finished {}: no OOS windows", label),
        }

        Ok(report.aggregate)
    }
}
