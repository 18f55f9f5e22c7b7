//! Error types

mod column;
mod pagination;

pub use column::*;
pub use pagination::*;

/// Umbrella error for building a table from caller-supplied descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A column set failed validation.
    #[error(transparent)]
    Column(#[from] ColumnError),

    /// A pagination descriptor failed validation.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}
