pub mod evaluation;
pub mod metrics;
pub mod selection;
pub mod walkforward;
