use crate::error::{Result, WfError};
use crate::types::{WindowSlice, WindowType};
use chrono::{Months, NaiveDate};

/// Ordered in-sample windows for a walk-forward run.
///
/// The first window ends at `first_os` and starts `window_length` months
/// earlier. Anchored schedules keep that start and push the end forward by
/// `step_months`; rolling schedules move both ends. A window is only emitted
/// while its end is on or before `last data date - step_months`, so every
/// window is followed by a full step of data for out-of-sample testing.
///
/// Month arithmetic clamps to month end (Jan 31 + 1 month = Feb 28/29) and
/// is applied step by step, so a clamped date carries into later windows.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkForwardSchedule {
    first_os: NaiveDate,
    window_length: u32,
    step_months: u32,
    window_type: WindowType,
    slices: Vec<WindowSlice>,
}

impl WalkForwardSchedule {
    /// `last_date` is the latest date with data; `None` (no data) yields no windows.
    pub fn new(
        last_date: Option<NaiveDate>,
        first_os: NaiveDate,
        window_length: u32,
        step_months: u32,
        window_type: WindowType,
    ) -> Result<Self> {
        if window_length == 0 {
            return Err(WfError::Configuration("window_length must be at least one month".to_string()));
        }
        if step_months == 0 {
            return Err(WfError::Configuration("step_months must be at least one month".to_string()));
        }

        let mut schedule = Self {
            first_os,
            window_length,
            step_months,
            window_type,
            slices: Vec::new(),
        };
        if let Some(last_date) = last_date {
            schedule.slices = schedule.generate_slices(last_date)?;
        }

        Ok(schedule)
    }

    pub fn get_slices(&self) -> &[WindowSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn window_type(&self) -> WindowType {
        self.window_type
    }

    pub fn step_months(&self) -> u32 {
        self.step_months
    }

    /// Start of the first in-sample window
    pub fn analysis_start(&self) -> Result<NaiveDate> {
        sub_months(self.first_os, self.window_length)
    }

    fn generate_slices(&self, last_date: NaiveDate) -> Result<Vec<WindowSlice>> {
        let analysis_start = self.analysis_start()?;
        let max_allowed_end = match last_date.checked_sub_months(Months::new(self.step_months)) {
            Some(date) => date,
            None => return Ok(Vec::new()),
        };

        let mut slices = Vec::new();
        match self.window_type {
            WindowType::Anchored => {
                let mut current_end = self.first_os;
                while current_end <= max_allowed_end {
                    slices.push(WindowSlice::new(analysis_start, current_end));
                    current_end = add_months(current_end, self.step_months)?;
                }
            }
            WindowType::Rolling => {
                let mut current_start = analysis_start;
                let mut current_end = add_months(current_start, self.window_length)?;
                while current_end <= max_allowed_end {
                    slices.push(WindowSlice::new(current_start, current_end));
                    current_start = add_months(current_start, self.step_months)?;
                    current_end = add_months(current_start, self.window_length)?;
                }
            }
        }

        Ok(slices)
    }
}

pub(crate) fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        WfError::Computation(format!("Date overflow adding {} months to {}", months, date))
    })
}

fn sub_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_sub_months(Months::new(months)).ok_or_else(|| {
        WfError::Computation(format!("Date overflow subtracting {} months from {}", months, date))
    })
}
