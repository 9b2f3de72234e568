pub mod correlation;
pub mod initial;
pub mod unit;

pub use correlation::GreedyCorrelationFilter;
pub use initial::{rank_indices, top_n_indices};
pub use unit::{SelectionParams, SelectionUnit};
