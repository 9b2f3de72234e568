use thiserror::Error;

#[derive(Error, Debug)]
pub enum WfError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown scoring function: {0}")]
    UnknownScore(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Computation error: {0}")]
    Computation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, WfError>;
