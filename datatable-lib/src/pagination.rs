//! Pagination descriptor and navigation controls.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

use crate::error::PaginationError;

/// Who slices rows into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// The caller passes rows that are already paged (e.g. server-side);
    /// the descriptor only drives the navigation controls.
    #[default]
    Advisory,
    /// The table slices the processed rows by page index and size.
    Local,
}

/// Navigation buttons rendered under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavButton {
    First,
    Previous,
    Next,
    Last,
}

impl NavButton {
    pub const ALL: [NavButton; 4] = [
        NavButton::First,
        NavButton::Previous,
        NavButton::Next,
        NavButton::Last,
    ];
}

/// Render state for one navigation button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControl {
    pub button: NavButton,
    pub disabled: bool,
    /// Page index the button navigates to.
    pub target: usize,
}

/// Pagination descriptor.
///
/// Page indices are 0-based. The descriptor is plain data; navigation
/// produces a new descriptor rather than changing this one.
///
/// # Example
///
/// ```
/// use datatable_lib::{NavButton, Pagination};
///
/// let page = Pagination::for_total(45, 20).unwrap();
/// assert_eq!(page.page_count(), 3);
/// assert!(page.control(NavButton::Previous).disabled);
///
/// let last = page.go_to(page.control(NavButton::Last).target);
/// assert_eq!(last.page_index(), 2);
/// assert_eq!(last.slice_range(45), 40..45);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    page_count: usize,
}

impl Pagination {
    /// Creates a descriptor from caller-known values.
    pub fn new(
        page_index: usize,
        page_size: usize,
        page_count: usize,
    ) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        if page_index > 0 && page_index >= page_count {
            return Err(PaginationError::PageOutOfRange {
                index: page_index,
                count: page_count,
            });
        }
        Ok(Self {
            page_index,
            page_size,
            page_count,
        })
    }

    /// First page of `total_rows` rows split by `page_size`.
    pub fn for_total(total_rows: usize, page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            page_index: 0,
            page_size,
            page_count: total_rows.div_ceil(page_size),
        })
    }

    /// Zero-based current page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of pages; zero when there are no rows.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// 1-based page number for display.
    pub fn display_page(&self) -> usize {
        self.page_index + 1
    }

    /// There is a page before the current one.
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    /// There is a page after the current one.
    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// Render state for one navigation button.
    ///
    /// `disabled` depends only on the page index bounds.
    pub fn control(&self, button: NavButton) -> NavControl {
        let last = self.page_count.saturating_sub(1);
        let (disabled, target) = match button {
            NavButton::First => (!self.can_previous(), 0),
            NavButton::Previous => (!self.can_previous(), self.page_index.saturating_sub(1)),
            NavButton::Next => (!self.can_next(), (self.page_index + 1).min(last)),
            NavButton::Last => (!self.can_next(), last),
        };
        NavControl {
            button,
            disabled,
            target,
        }
    }

    /// All four navigation controls in display order.
    pub fn controls(&self) -> [NavControl; 4] {
        NavButton::ALL.map(|button| self.control(button))
    }

    /// Copy moved to `page_index`, clamped to the last page.
    pub fn go_to(&self, page_index: usize) -> Self {
        Self {
            page_index: page_index.min(self.page_count.saturating_sub(1)),
            ..*self
        }
    }

    /// Copy with a new page size, back on the first page.
    ///
    /// The page count is recomputed from `total_rows` when known; otherwise
    /// the caller is expected to supply a fresh count.
    pub fn with_page_size(
        &self,
        page_size: usize,
        total_rows: Option<usize>,
    ) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self {
            page_index: 0,
            page_size,
            page_count: total_rows
                .map(|total| total.div_ceil(page_size))
                .unwrap_or(self.page_count),
        })
    }

    /// Copy with the page count recomputed for `total_rows`, keeping the
    /// index in range.
    pub fn with_total(&self, total_rows: usize) -> Self {
        let page_count = total_rows.div_ceil(self.page_size);
        Self {
            page_index: self.page_index.min(page_count.saturating_sub(1)),
            page_size: self.page_size,
            page_count,
        }
    }

    /// Row window for the current page within `total_rows` rows.
    pub fn slice_range(&self, total_rows: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total_rows);
        let end = start.saturating_add(self.page_size).min(total_rows);
        start..end
    }
}
