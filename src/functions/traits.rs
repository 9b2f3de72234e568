use crate::error::Result;
use crate::types::SortDirection;
use serde::{Deserialize, Serialize};

/// What a scoring function needs besides the return matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSignature {
    /// Returns only
    Returns,
    /// Returns plus the per-period risk-free rate
    ReturnsWithRiskFree,
    /// Returns plus the aligned turnover matrix
    ReturnsWithTurnover,
}

/// Capability tag fixed when a function is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDescriptor {
    pub direction: SortDirection,
    pub signature: ScoreSignature,
}

impl ScoreDescriptor {
    pub fn new(direction: SortDirection, signature: ScoreSignature) -> Self {
        Self { direction, signature }
    }
}

/// Inputs handed to a scoring function, shaped by its signature.
/// Matrices are column-major: one `Vec<f64>` per asset.
#[derive(Debug, Clone, Copy)]
pub enum ScoreArgs<'a> {
    Returns(&'a [Vec<f64>]),
    WithRiskFree(&'a [Vec<f64>], f64),
    WithTurnover(&'a [Vec<f64>], &'a [Vec<f64>]),
}

impl<'a> ScoreArgs<'a> {
    pub fn returns(&self) -> &'a [Vec<f64>] {
        match *self {
            Self::Returns(r) | Self::WithRiskFree(r, _) | Self::WithTurnover(r, _) => r,
        }
    }

    /// 0.0 unless the caller passed a rate
    pub fn risk_free_rate(&self) -> f64 {
        match *self {
            Self::WithRiskFree(_, rf) => rf,
            _ => 0.0,
        }
    }

    pub fn turnover(&self) -> Option<&'a [Vec<f64>]> {
        match *self {
            Self::WithTurnover(_, t) => Some(t),
            _ => None,
        }
    }
}

/// Maps an asset-return matrix to one score per asset column.
pub trait ScoringFunction: Send + Sync {
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>>;
}

impl<F> ScoringFunction for F
where
    F: Fn(ScoreArgs<'_>) -> Result<Vec<f64>> + Send + Sync,
{
    fn score(&self, args: ScoreArgs<'_>) -> Result<Vec<f64>> {
        self(args)
    }
}

/// Pin a closure to the scoring signature so its argument and error types infer.
pub fn score_fn<F>(f: F) -> F
where
    F: Fn(ScoreArgs<'_>) -> Result<Vec<f64>> + Send + Sync,
{
    f
}
