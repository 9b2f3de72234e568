use super::backtesting::BacktestConfig;
use super::traits::ConfigSection;
use crate::error::{Result, WfError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Candidate values for every `BacktestConfig` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigGrid {
    pub first_os: Vec<NaiveDate>,
    pub window_length: Vec<u32>,
    pub step_months: Vec<u32>,
    pub anchored: Vec<bool>,
    pub risk_free_rate: Vec<f64>,
    pub top_n: Vec<usize>,
    pub max_corr: Vec<f64>,
    pub max_columns: Vec<usize>,
    /// Empty means no average-trade threshold
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub min_avg_trade: Vec<f64>,
    pub metric_name: Vec<String>,
    pub periods_per_year: Vec<f64>,
}

impl Default for ConfigGrid {
    fn default() -> Self {
        let base = BacktestConfig::default();
        Self {
            first_os: vec![base.first_os],
            window_length: vec![base.window_length],
            step_months: vec![base.step_months],
            anchored: vec![base.anchored],
            risk_free_rate: vec![base.risk_free_rate],
            top_n: vec![base.top_n],
            max_corr: vec![base.max_corr],
            max_columns: vec![base.max_columns],
            min_avg_trade: base.min_avg_trade.into_iter().collect(),
            metric_name: vec![base.metric_name],
            periods_per_year: vec![base.periods_per_year],
        }
    }
}

impl ConfigGrid {
    /// Cartesian product in field order; the last field varies fastest.
    ///
    /// When the grid varies a field that the derived label leaves out, each
    /// config gets a `name` carrying those values so labels stay distinct.
    pub fn expand(&self) -> Vec<BacktestConfig> {
        let mut acc = vec![BacktestConfig::default()];
        acc = product(acc, &self.first_os, |c, v| c.first_os = v);
        acc = product(acc, &self.window_length, |c, v| c.window_length = v);
        acc = product(acc, &self.step_months, |c, v| c.step_months = v);
        acc = product(acc, &self.anchored, |c, v| c.anchored = v);
        acc = product(acc, &self.risk_free_rate, |c, v| c.risk_free_rate = v);
        acc = product(acc, &self.top_n, |c, v| c.top_n = v);
        acc = product(acc, &self.max_corr, |c, v| c.max_corr = v);
        acc = product(acc, &self.max_columns, |c, v| c.max_columns = v);
        acc = product(acc, &self.min_avg_trade_candidates(), |c, v| c.min_avg_trade = v);
        acc = product(acc, &self.metric_name, |c, v| c.metric_name = v);
        acc = product(acc, &self.periods_per_year, |c, v| c.periods_per_year = v);

        if self.varies_unlabeled_fields() {
            for config in &mut acc {
                config.name = Some(self.distinct_name(config));
            }
        }
        acc
    }

    fn varies_unlabeled_fields(&self) -> bool {
        self.first_os.len() > 1
            || self.risk_free_rate.len() > 1
            || self.top_n.len() > 1
            || self.max_corr.len() > 1
            || self.max_columns.len() > 1
            || self.min_avg_trade.len() > 1
            || self.periods_per_year.len() > 1
    }

    // e.g. "sharpe_WL12_Rolling_Step6_Top3_Corr0.2"
    fn distinct_name(&self, config: &BacktestConfig) -> String {
        let mut name = config.label();
        if self.first_os.len() > 1 {
            name.push_str(&format!("_OS{}", config.first_os));
        }
        if self.risk_free_rate.len() > 1 {
            name.push_str(&format!("_RF{}", config.risk_free_rate));
        }
        if self.top_n.len() > 1 {
            name.push_str(&format!("_Top{}", config.top_n));
        }
        if self.max_corr.len() > 1 {
            name.push_str(&format!("_Corr{}", config.max_corr));
        }
        if self.max_columns.len() > 1 {
            name.push_str(&format!("_Cols{}", config.max_columns));
        }
        if self.min_avg_trade.len() > 1 {
            if let Some(threshold) = config.min_avg_trade {
                name.push_str(&format!("_MinAT{}", threshold));
            }
        }
        if self.periods_per_year.len() > 1 {
            name.push_str(&format!("_PPY{}", config.periods_per_year));
        }
        name
    }

    pub fn len(&self) -> usize {
        self.first_os.len()
            * self.window_length.len()
            * self.step_months.len()
            * self.anchored.len()
            * self.risk_free_rate.len()
            * self.top_n.len()
            * self.max_corr.len()
            * self.max_columns.len()
            * self.min_avg_trade.len().max(1)
            * self.metric_name.len()
            * self.periods_per_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn min_avg_trade_candidates(&self) -> Vec<Option<f64>> {
        if self.min_avg_trade.is_empty() {
            vec![None]
        } else {
            self.min_avg_trade.iter().copied().map(Some).collect()
        }
    }
}

fn product<T, F>(acc: Vec<BacktestConfig>, values: &[T], set: F) -> Vec<BacktestConfig>
where
    T: Clone,
    F: Fn(&mut BacktestConfig, T),
{
    let mut out = Vec::with_capacity(acc.len() * values.len());
    for config in &acc {
        for value in values {
            let mut next = config.clone();
            set(&mut next, value.clone());
            out.push(next);
        }
    }
    out
}

impl ConfigSection for ConfigGrid {
    fn section_name() -> &'static str {
        "grid"
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(WfError::Configuration(
                "Every grid field needs at least one candidate".to_string()
            ));
        }
        for config in self.expand() {
            config.validate()?;
        }
        Ok(())
    }
}
