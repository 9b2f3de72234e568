use super::traits::ConfigSection;
use crate::engines::evaluation::TRADING_DAYS;
use crate::engines::selection::SelectionParams;
use crate::error::{Result, WfError};
use crate::types::WindowType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fully specified walk-forward run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// End of the first in-sample window
    pub first_os: NaiveDate,
    pub window_length: u32,
    pub step_months: u32,
    pub anchored: bool,
    pub risk_free_rate: f64,
    pub top_n: usize,
    pub max_corr: f64,
    pub max_columns: usize,
    #[serde(default)]
    pub min_avg_trade: Option<f64>,
    pub metric_name: String,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
    /// Overrides the derived ensemble label
    #[serde(default)]
    pub name: Option<String>,
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            first_os: NaiveDate::from_ymd_opt(2016, 12, 31).unwrap_or_default(),
            window_length: 12,
            step_months: 12,
            anchored: false,
            risk_free_rate: 0.0,
            top_n: 10,
            max_corr: 0.5,
            max_columns: 10,
            min_avg_trade: None,
            metric_name: "sharpe".to_string(),
            periods_per_year: TRADING_DAYS,
            name: None,
        }
    }
}

impl BacktestConfig {
    pub fn window_type(&self) -> WindowType {
        WindowType::from_anchored(self.anchored)
    }

    /// Ensemble key, e.g. "sharpe_WL12_Rolling_Step3"
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}_WL{}_{}_Step{}",
                self.metric_name,
                self.window_length,
                self.window_type().as_str(),
                self.step_months
            ),
        }
    }

    pub fn selection_params(&self) -> SelectionParams {
        SelectionParams {
            risk_free_rate: self.risk_free_rate,
            top_n: self.top_n,
            max_corr: self.max_corr,
            max_columns: self.max_columns,
            min_avg_trade: self.min_avg_trade,
        }
    }
}

impl ConfigSection for BacktestConfig {
    fn section_name() -> &'static str {
        "backtest"
    }

    fn validate(&self) -> Result<()> {
        if self.window_length == 0 {
            return Err(WfError::Configuration(
                "window_length must be at least one month".to_string()
            ));
        }
        if self.step_months == 0 {
            return Err(WfError::Configuration(
                "step_months must be at least one month".to_string()
            ));
        }
        if self.top_n == 0 || self.max_columns == 0 {
            return Err(WfError::Configuration(
                "top_n and max_columns must be positive".to_string()
            ));
        }
        if !self.max_corr.is_finite() || !self.risk_free_rate.is_finite() {
            return Err(WfError::Configuration(
                "max_corr and risk_free_rate must be finite".to_string()
            ));
        }
        if matches!(self.min_avg_trade, Some(t) if t.is_nan()) {
            return Err(WfError::Configuration(
                "min_avg_trade must be a number".to_string()
            ));
        }
        if self.periods_per_year <= 0.0 {
            return Err(WfError::Configuration(
                "periods_per_year must be positive".to_string()
            ));
        }
        if self.metric_name.trim().is_empty() {
            return Err(WfError::Configuration(
                "metric_name must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
