//! Error types for querymapper

use thiserror::Error;

/// Result type alias for querymapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Error types for statement building and execution
#[derive(Debug, Error)]
pub enum MapperError {
    /// A required connection parameter is absent from the configuration.
    ///
    /// Raised at initialize time, before any connection attempt.
    #[error("{dialect} connection parameters are missing: {key}. Check the environment variables have loaded correctly.")]
    ConfigurationMissing {
        dialect: &'static str,
        key: &'static str,
    },

    /// The backend driver for the requested dialect is not loadable.
    #[error("{0} driver is required.")]
    DriverUnavailable(&'static str),

    /// A where condition did not carry exactly field, operator and value.
    #[error("Invalid where condition. Expected 3 elements, got {0}.")]
    MalformedCondition(usize),

    /// An order-by sort did not carry 1 or 2 elements.
    #[error("Invalid order by condition. Expected 1 or 2 elements, got {0}.")]
    MalformedSort(usize),

    /// A row could not be mapped into a record; names the missing column.
    #[error("column {0} is missing from the row")]
    ColumnMissing(String),

    /// Any execution-time failure, re-signalled with the original message only.
    ///
    /// The statement fragments and bindings are written to the log, never
    /// exposed through the error itself.
    #[error("{0}")]
    BuilderFailure(String),
}

impl MapperError {
    /// Create an execution failure from any message.
    pub fn builder(message: impl Into<String>) -> Self {
        Self::BuilderFailure(message.into())
    }

    /// Check if this is a recoverable caller-input error.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedCondition(_) | Self::MalformedSort(_)
        )
    }
}
