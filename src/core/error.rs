use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressionError {
    /// Caller passed a value outside the accepted domain (negative counts,
    /// scores outside their range, NaN)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Static tables are malformed; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Spirit not found: {0}")]
    SpiritNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl ProgressionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ProgressionError::InvalidInput(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ProgressionError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ProgressionError>;
