use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ranking order declared by a scoring function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,  // lower is better (drawdown)
    Descending, // higher is better (Sharpe, momentum)
}

/// In-sample window policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowType {
    Rolling,  // fixed-length window slides forward
    Anchored, // start stays fixed, window grows
}

impl WindowType {
    pub fn from_anchored(anchored: bool) -> Self {
        if anchored {
            Self::Anchored
        } else {
            Self::Rolling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rolling => "Rolling",
            Self::Anchored => "Anchored",
        }
    }
}

/// Inclusive in-sample date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowSlice {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WindowSlice {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Human readable period key, e.g. "2016-01-01 to 2016-12-31"
    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

/// Date-indexed values, dates ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatedSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl DatedSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self { dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Concatenate, order by date and keep the first value seen for a repeated date.
    pub fn concat_sorted<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a DatedSeries>,
    {
        let mut points: Vec<(NaiveDate, f64)> = parts
            .into_iter()
            .flat_map(|s| s.dates.iter().copied().zip(s.values.iter().copied()))
            .collect();

        // stable: ties keep window order
        points.sort_by_key(|(date, _)| *date);
        points.dedup_by_key(|(date, _)| *date);

        let (dates, values) = points.into_iter().unzip();
        Self { dates, values }
    }
}

/// Per-window outcome of the two-stage asset selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Top-N assets by score, best first
    pub selected: Vec<String>,
    pub selected_scores: Vec<f64>,
    /// Subset of `selected` surviving the correlation and turnover filters
    pub filtered: Vec<String>,
    pub filtered_scores: Vec<f64>,
    /// Average-trade ratio aligned with `filtered`, only when the turnover filter ran
    pub avg_trade: Option<Vec<f64>>,
}

impl SelectionResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Selection made on one in-sample window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSelection {
    pub window: WindowSlice,
    pub selection: SelectionResult,
}

impl WindowSelection {
    pub fn label(&self) -> String {
        self.window.label()
    }
}

/// Realized performance of one window's selection on the following period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OosResult {
    pub portfolio_returns: DatedSeries,
    pub portfolio_turnover: Option<DatedSeries>,
    pub cumulative_return: f64,
    /// Annualized
    pub volatility: f64,
    pub sharpe: f64,
    pub avg_trade: Option<f64>,
}

/// OOS result tagged with the in-sample window that produced the selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowOos {
    pub window: WindowSlice,
    pub oos_start: NaiveDate,
    pub oos_end: NaiveDate,
    pub result: OosResult,
}

/// Whole-run OOS performance for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub full_oos_series: DatedSeries,
    pub overall_cumulative_return: f64,
    pub overall_volatility: f64,
    pub overall_sharpe: f64,
    /// `None` when no turnover series was collected
    pub overall_avg_trade: Option<f64>,
    pub windows: usize,
}
