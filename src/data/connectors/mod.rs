mod csv;
mod types;
mod validator;

pub use csv::CsvConnector;
pub use types::{DatasetMetadata, TableKind, DATE_ALIASES};
pub use validator::DataValidator;
