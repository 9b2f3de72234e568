use super::{
    scores::{AvgTrade, Composite, HighestReturn, MaxDrawdown, Momentum, Sharpe, Volatility},
    traits::{ScoreArgs, ScoreDescriptor, ScoreSignature, ScoringFunction},
};
use crate::error::{Result, WfError};
use crate::types::SortDirection;
use std::{collections::BTreeMap, fmt, sync::Arc};

/// A scoring function together with the capability tag it was registered with.
#[derive(Clone)]
pub struct RegisteredScore {
    name: String,
    descriptor: ScoreDescriptor,
    function: Arc<dyn ScoringFunction>,
}

impl RegisteredScore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> ScoreDescriptor {
        self.descriptor
    }

    pub fn direction(&self) -> SortDirection {
        self.descriptor.direction
    }

    pub fn signature(&self) -> ScoreSignature {
        self.descriptor.signature
    }

    /// Score every column, dispatching on the registered signature.
    pub fn score(
        &self,
        returns: &[Vec<f64>],
        risk_free_rate: f64,
        turnover: Option<&[Vec<f64>]>,
    ) -> Result<Vec<f64>> {
        let args = match self.descriptor.signature {
            ScoreSignature::Returns => ScoreArgs::Returns(returns),
            ScoreSignature::ReturnsWithRiskFree => ScoreArgs::WithRiskFree(returns, risk_free_rate),
            ScoreSignature::ReturnsWithTurnover => {
                let turnover = turnover.ok_or_else(|| {
                    WfError::Configuration(format!(
                        "Scoring function '{}' requires turnover data",
                        self.name
                    ))
                })?;
                ScoreArgs::WithTurnover(returns, turnover)
            }
        };

        let scores = self.function.score(args)?;
        if scores.len() != returns.len() {
            return Err(WfError::Computation(format!(
                "Scoring function '{}' returned {} scores for {} assets",
                self.name,
                scores.len(),
                returns.len()
            )));
        }
        Ok(scores)
    }
}

impl fmt::Debug for RegisteredScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredScore")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Name -> scoring function mapping, built explicitly and handed to the runners.
#[derive(Debug, Clone, Default)]
pub struct ScoringRegistry {
    functions: BTreeMap<String, RegisteredScore>,
}

impl ScoringRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in scores
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    pub fn register<F>(&mut self, name: &str, descriptor: ScoreDescriptor, function: F) -> &mut Self
    where
        F: ScoringFunction + 'static,
    {
        self.functions.insert(
            name.to_string(),
            RegisteredScore {
                name: name.to_string(),
                descriptor,
                function: Arc::new(function),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredScore> {
        self.functions.get(name)
    }

    /// Like `get`, but an unknown name is an error
    pub fn resolve(&self, name: &str) -> Result<RegisteredScore> {
        self.get(name)
            .cloned()
            .ok_or_else(|| WfError::UnknownScore(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn register_defaults(&mut self) {
        use ScoreSignature::*;
        use SortDirection::*;

        self.register("sharpe", ScoreDescriptor::new(Descending, ReturnsWithRiskFree), Sharpe)
            .register("highest_return", ScoreDescriptor::new(Descending, Returns), HighestReturn)
            .register("max_drawdown", ScoreDescriptor::new(Ascending, Returns), MaxDrawdown)
            .register("volatility", ScoreDescriptor::new(Descending, Returns), Volatility)
            .register("momentum", ScoreDescriptor::new(Descending, Returns), Momentum::default())
            .register("avg_trade", ScoreDescriptor::new(Descending, ReturnsWithTurnover), AvgTrade)
            .register("composite", ScoreDescriptor::new(Descending, ReturnsWithRiskFree), Composite::default());
    }
}
