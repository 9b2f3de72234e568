use crate::data::table::{ReturnTable, TurnoverTable};
use crate::error::{Result, WfError};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Seeded random return/turnover matrices on a business-day calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub n_assets: usize,
    pub seed: u64,
    /// Standard deviation of the daily returns
    pub volatility: f64,
    /// Turnover is drawn uniformly from [0, max_turnover)
    pub max_turnover: f64,
}

impl Default for SyntheticData {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            n_assets: 90,
            seed: 42,
            volatility: 1.0,
            max_turnover: 0.02,
        }
    }
}

impl SyntheticData {
    /// Monday-to-Friday dates in `[start, end]`
    pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = start;
        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                dates.push(current);
            }
            match current.checked_add_days(Days::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        dates
    }

    pub fn generate(&self) -> Result<(ReturnTable, TurnoverTable)> {
        if self.n_assets == 0 {
            return Err(WfError::Configuration("Synthetic data needs at least one asset".to_string()));
        }
        if !(self.max_turnover > 0.0) {
            return Err(WfError::Configuration("max_turnover must be positive".to_string()));
        }

        let normal = Normal::new(0.0, self.volatility).map_err(|e| {
            WfError::Configuration(format!("Invalid synthetic volatility {}: {}", self.volatility, e))
        })?;

        let dates = Self::business_days(self.start, self.end);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut returns = Vec::with_capacity(self.n_assets);
        let mut turnover = Vec::with_capacity(self.n_assets);
        for i in 0..self.n_assets {
            let name = format!("col_{}", i);
            let r: Vec<f64> = (0..dates.len())
                .map(|_| normal.sample(&mut rng))
                .collect();
            let t: Vec<f64> = (0..dates.len())
                .map(|_| rng.gen_range(0.0..self.max_turnover))
                .collect();
            returns.push((name.clone(), r));
            turnover.push((name, t));
        }

        Ok((
            ReturnTable::from_columns(dates.clone(), returns)?,
            ReturnTable::from_columns(dates, turnover)?,
        ))
    }
}
