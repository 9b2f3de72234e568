//! Walk-forward asset selection and out-of-sample backtesting.
//!
//! A run ranks the assets of a return table on rolling or anchored
//! in-sample windows, prunes correlated picks, and evaluates an
//! equal-weight basket of the survivors on the following period.
//! [`engines::evaluation::EnsembleRunner`] repeats that across many
//! configurations.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use error::{Result, WfError};
