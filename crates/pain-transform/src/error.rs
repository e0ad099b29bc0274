use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A structural step names a column the dataset does not have.
    #[error("{op}: column '{column}' not found")]
    ColumnNotFound { op: &'static str, column: String },

    /// A governed cell could not be stored as an integer code.
    #[error("column '{column}' row {row}: '{value}' is not an integer code")]
    NotAnIntegerCode {
        column: String,
        row: usize,
        value: String,
    },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
