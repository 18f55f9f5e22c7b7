//! Pagination error types

/// Errors raised when a pagination descriptor is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page size must be at least one row.
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// The requested page lies past the last page.
    #[error("Page {index} is out of range (page count {count})")]
    PageOutOfRange {
        /// Requested 0-based page index.
        index: usize,
        /// Total number of pages.
        count: usize,
    },
}
