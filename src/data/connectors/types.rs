use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted spellings of the date column in wide CSV files
pub const DATE_ALIASES: [&str; 8] = [
    "date", "Date", "DATE", "datetime", "DateTime", "time", "timestamp", "index",
];

/// Which kind of matrix a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Returns,
    Turnover,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Returns => "returns",
            Self::Turnover => "turnover",
        }
    }
}

/// Metadata about a loaded CSV table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub kind: TableKind,
    pub num_rows: usize,
    pub assets: Vec<String>,
    pub date_column: String,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub null_counts: Vec<(String, usize)>,
}

impl DatasetMetadata {
    /// One-line description for logs
    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "no dates".to_string(),
        };
        let nulls: usize = self.null_counts.iter().map(|(_, n)| n).sum();
        format!(
            "{} from {}: {} rows x {} assets, {} (date column '{}'), {} nulls",
            self.kind.as_str(),
            self.file_path,
            self.num_rows,
            self.assets.len(),
            range,
            self.date_column,
            nulls
        )
    }
}
