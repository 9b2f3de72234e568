use crate::engines::metrics::RiskMetrics;
use serde::{Deserialize, Serialize};

/// Greedy rank-order pruning of correlated candidates.
///
/// Candidates arrive best first. The first one is always kept; each later one
/// is kept only if its correlation with every kept candidate is strictly below
/// `max_corr`. Stops once `max_columns` candidates are kept. The result is
/// order-stable and biased toward the best score, not a maximum independent set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreedyCorrelationFilter {
    pub max_corr: f64,
    pub max_columns: usize,
}

impl GreedyCorrelationFilter {
    pub fn new(max_corr: f64, max_columns: usize) -> Self {
        Self { max_corr, max_columns }
    }

    /// Positions (into `candidates`) of the retained columns, ascending.
    pub fn filter(&self, candidates: &[Vec<f64>]) -> Vec<usize> {
        if candidates.is_empty() || self.max_columns == 0 {
            return Vec::new();
        }

        let mut kept = vec![0];
        for idx in 1..candidates.len() {
            if kept.len() >= self.max_columns {
                break;
            }

            let uncorrelated = kept.iter().all(|&sel| {
                RiskMetrics::correlation(&candidates[sel], &candidates[idx]) < self.max_corr
            });
            if uncorrelated {
                kept.push(idx);
            }
        }

        kept
    }
}
