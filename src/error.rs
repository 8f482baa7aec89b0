//! Error types for filter operations.

use thiserror::Error;

/// Errors raised by [`crate::data::filter::FilterEngine`].
///
/// None of these is fatal: a rejected operation leaves the engine exactly as
/// it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The column is not one of the initialized filterable columns.
    #[error("unknown filter column: {0}")]
    UnknownColumn(String),

    /// A filterable column collides with the row identifier column.
    #[error("filter column '{0}' collides with the reserved identifier column")]
    ReservedColumn(String),

    /// The same filterable column was listed more than once.
    #[error("filter column '{0}' listed more than once")]
    DuplicateColumn(String),

    /// A filterable column does not appear in the dataset header.
    #[error("filter column '{0}' is not a dataset header")]
    ColumnNotInHeader(String),
}

impl FilterError {
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }
}
