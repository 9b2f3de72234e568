use crate::data::table::ReturnTable;
use crate::error::{Result, WfError};
use polars::prelude::*;
use std::path::Path;
use super::{
    types::{DatasetMetadata, TableKind, DATE_ALIASES},
    validator::DataValidator,
};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| WfError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a wide date x asset CSV into a validated table
    pub fn load_table<P: AsRef<Path>>(path: P, kind: TableKind) -> Result<(ReturnTable, DatasetMetadata)> {
        let df = Self::load(&path)?;

        // Warn about nulls but don't fail; they read back as NaN
        let null_counts = DataValidator::check_nulls(&df)?;
        if !null_counts.is_empty() {
            log::warn!("Null values detected in {} data: {:?}", kind.as_str(), null_counts);
        }

        let (df, date_column) = Self::normalize_columns(df)?;
        let table = ReturnTable::new(df)?;

        let metadata = DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            kind,
            num_rows: table.height(),
            assets: table.assets().to_vec(),
            date_column,
            date_range: table.first_date().zip(table.last_date()),
            null_counts,
        };

        log::debug!("Loaded {}", metadata.summary());

        Ok((table, metadata))
    }

    /// Rename the detected date column to `date` and cast every other column to f64.
    /// Returns the frame and the original date column name.
    pub fn normalize_columns(mut df: DataFrame) -> Result<(DataFrame, String)> {
        let date_column = Self::detect_date_column(&df).ok_or_else(|| {
            WfError::DataLoading(format!(
                "Missing date column (tried aliases: {:?})",
                DATE_ALIASES
            ))
        })?;

        if date_column != ReturnTable::DATE_COLUMN {
            df.rename(&date_column, ReturnTable::DATE_COLUMN.into())
                .map_err(|e| WfError::DataLoading(format!("Failed to rename column: {}", e)))?;
        }

        let casts: Vec<Expr> = df
            .get_column_names()
            .iter()
            .filter(|name| name.as_str() != ReturnTable::DATE_COLUMN)
            .map(|name| col(name.as_str()).cast(DataType::Float64))
            .collect();

        let df = df
            .lazy()
            .with_columns(casts)
            .with_column(col(ReturnTable::DATE_COLUMN).cast(DataType::Date))
            .collect()?;

        Ok((df, date_column))
    }

    fn detect_date_column(df: &DataFrame) -> Option<String> {
        let columns = df.get_column_names();
        DATE_ALIASES
            .iter()
            .find(|&&alias| columns.iter().any(|col| col.as_str() == alias))
            .map(|alias| alias.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_normalize_columns() {
        let df = df! {
            "Date" => &["2020-01-01", "2020-01-02"],
            "AAA" => &[1i64, 2],
            "BBB" => &[0.5, 0.25],
        }
        .unwrap();

        let (df, original) = CsvConnector::normalize_columns(df).unwrap();
        assert_eq!(original, "Date");
        assert!(df.get_column_names().iter().any(|c| c.as_str() == "date"));
        assert_eq!(df.column("AAA").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_missing_date_column() {
        let df = df! {
            "AAA" => &[0.1, 0.2],
        }
        .unwrap();

        assert!(CsvConnector::normalize_columns(df).is_err());
    }

    #[test]
    fn test_load_table_from_file() {
        let path = std::env::temp_dir().join(format!("wfbundle_csv_{}.csv", std::process::id()));
        std::fs::write(
            &path,
            "date,AAA,BBB\n2020-01-01,0.01,0.02\n2020-01-02,-0.01,0.00\n2020-01-03,0.02,0.01\n",
        )
        .unwrap();

        let (table, meta) = CsvConnector::load_table(&path, TableKind::Returns).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.height(), 3);
        assert_eq!(meta.assets, vec!["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(meta.num_rows, 3);
        assert_eq!(meta.date_column, "date");
        assert_eq!(
            meta.date_range,
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1).zip(chrono::NaiveDate::from_ymd_opt(2020, 1, 3))
        );
        assert!(meta.null_counts.is_empty());
        assert_eq!(table.column("AAA").unwrap(), vec![0.01, -0.01, 0.02]);
    }
}
