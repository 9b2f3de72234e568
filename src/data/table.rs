use crate::error::{Result, WfError};
use chrono::NaiveDate;
use polars::prelude::*;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date-indexed matrix of per-asset values backed by a polars `DataFrame`.
///
/// The frame holds one `date` column (polars `Date`, strictly increasing)
/// and one `f64` column per asset. Tables are immutable; slicing returns a
/// new table sharing the underlying buffers.
#[derive(Debug, Clone)]
pub struct ReturnTable {
    frame: DataFrame,
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
}

/// Turnover uses the same layout as returns.
pub type TurnoverTable = ReturnTable;

impl ReturnTable {
    pub const DATE_COLUMN: &'static str = "date";

    /// Wrap a frame that has a `date` column and numeric asset columns.
    pub fn new(frame: DataFrame) -> Result<Self> {
        let date_col = frame.column(Self::DATE_COLUMN).map_err(|_| {
            WfError::Validation(format!("Missing '{}' column", Self::DATE_COLUMN))
        })?;
        let dates = extract_dates(date_col)?;

        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(WfError::Validation(format!(
                    "Dates must be strictly increasing: {} followed by {}",
                    pair[0], pair[1]
                )));
            }
        }

        let mut columns: Vec<Column> = Vec::with_capacity(frame.width());
        columns.push(date_col.cast(&DataType::Date)?);

        let mut assets = Vec::with_capacity(frame.width().saturating_sub(1));
        for column in frame.get_columns() {
            let name = column.name().to_string();
            if name == Self::DATE_COLUMN {
                continue;
            }
            if !matches!(
                column.dtype(),
                DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32
            ) {
                return Err(WfError::Validation(format!(
                    "Column '{}' must be numeric, found {:?}",
                    name,
                    column.dtype()
                )));
            }
            columns.push(column.cast(&DataType::Float64)?);
            assets.push(name);
        }

        let frame = DataFrame::new(columns)?;

        Ok(Self { frame, dates, assets })
    }

    /// Build a table from plain vectors, one `(name, values)` pair per asset.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let mut frame_columns: Vec<Column> = Vec::with_capacity(columns.len() + 1);
        frame_columns.push(Column::new(Self::DATE_COLUMN.into(), dates.as_slice()));

        for (name, values) in columns {
            if values.len() != dates.len() {
                return Err(WfError::Validation(format!(
                    "Column '{}' has {} values for {} dates",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
            frame_columns.push(Column::new(name.as_str().into(), values));
        }

        Self::new(DataFrame::new(frame_columns)?)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn has_asset(&self, name: &str) -> bool {
        self.assets.iter().any(|a| a == name)
    }

    /// Rows with `start <= date <= end`.
    pub fn slice_dates(&self, start: NaiveDate, end: NaiveDate) -> ReturnTable {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = self.dates.partition_point(|d| *d <= end).max(lo);

        Self {
            frame: self.frame.slice(lo as i64, hi - lo),
            dates: self.dates[lo..hi].to_vec(),
            assets: self.assets.clone(),
        }
    }

    /// Values of one asset; nulls become NaN.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        if !self.has_asset(name) {
            return Err(WfError::Validation(format!("Unknown asset column '{}'", name)));
        }
        let values = self.frame.column(name)?.f64()?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    pub fn columns(&self, names: &[String]) -> Result<Vec<Vec<f64>>> {
        names.iter().map(|name| self.column(name)).collect()
    }

    /// Every asset column, in table order.
    pub fn all_columns(&self) -> Result<Vec<Vec<f64>>> {
        self.columns(&self.assets)
    }
}

fn extract_dates(column: &Column) -> Result<Vec<NaiveDate>> {
    let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    let days = days.i32()?;

    days.into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let value = value.ok_or_else(|| {
                WfError::Validation(format!("Null date at row {}", idx))
            })?;
            NaiveDate::from_num_days_from_ce_opt(value + UNIX_EPOCH_DAYS_FROM_CE).ok_or_else(|| {
                WfError::Validation(format!("Date out of range at row {}: {}", idx, value))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> ReturnTable {
        ReturnTable::from_columns(
            vec![d(2020, 1, 1), d(2020, 1, 2), d(2020, 1, 3), d(2020, 1, 6)],
            vec![
                ("A".to_string(), vec![0.01, 0.02, 0.03, 0.04]),
                ("B".to_string(), vec![-0.01, 0.0, 0.01, 0.02]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_dates_round_trip_through_frame() {
        let table = sample();
        assert_eq!(table.dates()[0], d(2020, 1, 1));
        assert_eq!(table.last_date(), Some(d(2020, 1, 6)));
        assert_eq!(table.assets(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_slice_dates_is_inclusive() {
        let table = sample();
        let slice = table.slice_dates(d(2020, 1, 2), d(2020, 1, 3));
        assert_eq!(slice.height(), 2);
        assert_eq!(slice.column("A").unwrap(), vec![0.02, 0.03]);

        // bounds falling between rows
        let slice = table.slice_dates(d(2020, 1, 4), d(2020, 1, 10));
        assert_eq!(slice.dates(), &[d(2020, 1, 6)]);

        let empty = table.slice_dates(d(2021, 1, 1), d(2021, 2, 1));
        assert!(empty.is_empty());
        assert!(empty.column("B").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unsorted_dates() {
        let result = ReturnTable::from_columns(
            vec![d(2020, 1, 2), d(2020, 1, 1)],
            vec![("A".to_string(), vec![0.0, 0.0])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = ReturnTable::from_columns(
            vec![d(2020, 1, 1), d(2020, 1, 2)],
            vec![("A".to_string(), vec![0.0])],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_column() {
        assert!(sample().column("Z").is_err());
    }
}
