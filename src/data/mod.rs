pub mod connectors;
pub mod synthetic;
pub mod table;

pub use connectors::{CsvConnector, DataValidator, DatasetMetadata, TableKind};
pub use synthetic::SyntheticData;
pub use table::{ReturnTable, TurnoverTable};
