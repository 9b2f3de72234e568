use super::{correlation::GreedyCorrelationFilter, initial::top_n_indices};
use crate::data::{ReturnTable, TurnoverTable};
use crate::engines::metrics::ProfitabilityMetrics;
use crate::error::Result;
use crate::functions::RegisteredScore;
use crate::types::SelectionResult;
use serde::{Deserialize, Serialize};

/// In-sample selection knobs shared by every window of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    pub risk_free_rate: f64,
    pub top_n: usize,
    pub max_corr: f64,
    pub max_columns: usize,
    pub min_avg_trade: Option<f64>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            top_n: 10,
            max_corr: 0.5,
            max_columns: 10,
            min_avg_trade: None,
        }
    }
}

/// Score -> correlation filter -> turnover filter, for one in-sample window.
pub struct SelectionUnit<'a> {
    returns: &'a ReturnTable,
    turnover: Option<&'a TurnoverTable>,
    params: &'a SelectionParams,
}

impl<'a> SelectionUnit<'a> {
    /// `returns` and `turnover` are already sliced to the window.
    pub fn new(
        returns: &'a ReturnTable,
        turnover: Option<&'a TurnoverTable>,
        params: &'a SelectionParams,
    ) -> Self {
        Self { returns, turnover, params }
    }

    pub fn perform_selection(&self, scorer: &RegisteredScore) -> Result<SelectionResult> {
        if self.returns.is_empty() || self.returns.assets().is_empty() {
            return Ok(SelectionResult::empty());
        }

        // Stage 1: rank every asset, keep the best top_n
        let returns = self.returns.all_columns()?;
        let turnover = match self.turnover {
            Some(t) => Some(t.columns(self.returns.assets())?),
            None => None,
        };
        let scores = scorer.score(&returns, self.params.risk_free_rate, turnover.as_deref())?;

        let top = top_n_indices(&scores, scorer.direction(), self.params.top_n);
        let assets = self.returns.assets();
        let selected: Vec<String> = top.iter().map(|&i| assets[i].clone()).collect();
        let selected_scores: Vec<f64> = top.iter().map(|&i| scores[i]).collect();

        // Stage 2: greedy correlation pruning in rank order
        let candidates: Vec<Vec<f64>> = top.iter().map(|&i| returns[i].clone()).collect();
        let filter = GreedyCorrelationFilter::new(self.params.max_corr, self.params.max_columns);
        let kept = filter.filter(&candidates);

        let mut filtered: Vec<usize> = kept.iter().map(|&k| top[k]).collect();
        let mut filtered_scores: Vec<f64> = kept.iter().map(|&k| selected_scores[k]).collect();

        // Stage 3: average-trade viability, only with turnover data and a threshold
        let avg_trade = match (turnover.as_ref(), self.params.min_avg_trade) {
            (Some(turnover), Some(threshold)) => {
                let ratios: Vec<f64> = filtered
                    .iter()
                    .map(|&i| ProfitabilityMetrics::avg_trade_ratio(&returns[i], &turnover[i]))
                    .collect();

                // NaN ratios fail the comparison and drop out
                let keep: Vec<bool> = ratios.iter().map(|&r| r >= threshold).collect();
                filtered = retain_mask(filtered, &keep);
                filtered_scores = retain_mask(filtered_scores, &keep);
                Some(retain_mask(ratios, &keep))
            }
            _ => None,
        };

        Ok(SelectionResult {
            selected,
            selected_scores,
            filtered: filtered.iter().map(|&i| assets[i].clone()).collect(),
            filtered_scores,
            avg_trade,
        })
    }
}

fn retain_mask<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep.iter())
        .filter_map(|(v, &k)| if k { Some(v) } else { None })
        .collect()
}
