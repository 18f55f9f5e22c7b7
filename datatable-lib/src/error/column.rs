//! ColumnError for column set construction

/// Error type for building a [`ColumnSet`](crate::ColumnSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Two columns share the same id.
    #[error("Duplicate column id '{id}'")]
    DuplicateId { id: String },

    /// A column was declared with an empty id.
    #[error("Column at position {position} has an empty id")]
    EmptyId { position: usize },
}

impl ColumnError {
    /// Creates a new duplicate id error.
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Creates a new empty id error.
    pub fn empty(position: usize) -> Self {
        Self::EmptyId { position }
    }
}
