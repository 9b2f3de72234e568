use crate::data::table::{ReturnTable, TurnoverTable};
use crate::error::{Result, WfError};
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Turnover must share the return table's dates and asset columns, and be non-negative.
    pub fn validate_turnover(returns: &ReturnTable, turnover: &TurnoverTable) -> Result<()> {
        if returns.dates() != turnover.dates() {
            return Err(WfError::Validation(format!(
                "Turnover dates do not match returns: {} rows vs {} rows",
                turnover.height(),
                returns.height()
            )));
        }

        for asset in returns.assets() {
            if !turnover.has_asset(asset) {
                return Err(WfError::Validation(format!(
                    "Turnover table is missing asset column '{}'",
                    asset
                )));
            }
        }

        for asset in turnover.assets() {
            let values = turnover.column(asset)?;
            if let Some((row, value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| **v < 0.0)
            {
                return Err(WfError::Validation(format!(
                    "Negative turnover for '{}' at row {}: {}",
                    asset, row, value
                )));
            }
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(table: &ReturnTable, min_rows: usize) -> Result<()> {
        if table.height() < min_rows {
            return Err(WfError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                table.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for column in df.get_columns() {
            let null_count = column.null_count();
            if null_count > 0 {
                null_report.push((column.name().to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dates() -> Vec<NaiveDate> {
        (1..=3).map(|d| NaiveDate::from_ymd_opt(2021, 3, d).unwrap()).collect()
    }

    fn table(a: Vec<f64>, b: Vec<f64>) -> ReturnTable {
        ReturnTable::from_columns(dates(), vec![("A".to_string(), a), ("B".to_string(), b)]).unwrap()
    }

    #[test]
    fn test_aligned_turnover_passes() {
        let returns = table(vec![0.01, 0.02, 0.03], vec![0.0, 0.01, -0.01]);
        let turnover = table(vec![0.1, 0.0, 0.2], vec![0.0, 0.0, 0.0]);
        assert!(DataValidator::validate_turnover(&returns, &turnover).is_ok());
    }

    #[test]
    fn test_negative_turnover_rejected() {
        let returns = table(vec![0.01, 0.02, 0.03], vec![0.0, 0.01, -0.01]);
        let turnover = table(vec![0.1, -0.1, 0.2], vec![0.0, 0.0, 0.0]);
        assert!(DataValidator::validate_turnover(&returns, &turnover).is_err());
    }

    #[test]
    fn test_missing_turnover_column_rejected() {
        let returns = table(vec![0.01, 0.02, 0.03], vec![0.0, 0.01, -0.01]);
        let turnover = ReturnTable::from_columns(dates(), vec![("A".to_string(), vec![0.1, 0.1, 0.1])]).unwrap();
        assert!(DataValidator::validate_turnover(&returns, &turnover).is_err());
    }

    #[test]
    fn test_minimum_rows() {
        let returns = table(vec![0.01, 0.02, 0.03], vec![0.0, 0.01, -0.01]);
        assert!(DataValidator::validate_minimum_rows(&returns, 3).is_ok());
        assert!(DataValidator::validate_minimum_rows(&returns, 4).is_err());
    }
}
