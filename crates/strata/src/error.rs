use thiserror::Error;

/// Construction failures for the column index and the mesh builder.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrataError {
    #[error("invalid column metadata: {0}")]
    InvalidMetadata(String),
    #[error("invalid spiral parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, StrataError>;
