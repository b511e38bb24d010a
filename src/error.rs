/// Unified error type for the optimizer
/// Provides structured error handling with categories for different failure modes
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum OptimizeError {
    /// Table construction/mutation errors: schema mismatch, duplicate names,
    /// ragged columns, out-of-range column index
    #[error("Table error: {message}")]
    Table {
        message: String,
        column: Option<String>,
    },

    /// Cast errors: the arrow cast kernel refused to retag a column
    #[error("Cast error on column '{column}': {message}")]
    Cast {
        column: String,
        target: String,
        message: String,
    },

    /// Internal errors: should never happen, indicates bug
    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl OptimizeError {
    pub fn table(message: impl Into<String>) -> Self {
        Self::Table {
            message: message.into(),
            column: None,
        }
    }

    pub fn table_with_column(message: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Table {
            message: message.into(),
            column: Some(column.into()),
        }
    }

    pub fn cast(column: impl Into<String>, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cast {
            column: column.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for OptimizeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type alias for optimizer operations
pub type OptimizeResult<T> = Result<T, OptimizeError>;
