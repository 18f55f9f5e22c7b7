//! Table display configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::pagination::PaginationMode;

/// Display and behaviour flags for a table instance.
///
/// Built with `with_*` methods or deserialized from JSON; missing fields
/// take their defaults.
///
/// # Example
///
/// ```
/// use datatable_lib::TableConfig;
///
/// let config = TableConfig::default()
///     .with_striped(true)
///     .with_mobile_breakpoint(640)
///     .with_empty_message("No products match");
///
/// let loaded: TableConfig = serde_json::from_str(r#"{"compact": true}"#).unwrap();
/// assert_eq!(loaded.mobile_breakpoint, 768);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Alternate row shading.
    pub striped: bool,

    /// Cell borders.
    pub bordered: bool,

    /// Reduced row padding.
    pub compact: bool,

    /// Rows are being fetched; renders a loading state instead of rows.
    pub loading: bool,

    /// Shown when no rows remain after filtering.
    ///
    /// Default: "No data"
    pub empty_message: String,

    /// Viewports narrower than this many pixels render cards.
    ///
    /// Default: 768
    pub mobile_breakpoint: u32,

    /// Quiet period before a resize is applied, in milliseconds.
    ///
    /// Default: 150
    pub resize_debounce_ms: u64,

    /// Choices offered by the page-size selector.
    ///
    /// Default: 10, 25, 50, 100
    pub page_size_options: Vec<usize>,

    /// Whether the table slices rows itself.
    ///
    /// Default: advisory (rows arrive already paged)
    pub pagination_mode: PaginationMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            striped: false,
            bordered: false,
            compact: false,
            loading: false,
            empty_message: "No data".to_string(),
            mobile_breakpoint: 768,
            resize_debounce_ms: 150,
            page_size_options: vec![10, 25, 50, 100],
            pagination_mode: PaginationMode::Advisory,
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Alternates row shading.
    pub fn with_striped(mut self, striped: bool) -> Self {
        self.striped = striped;
        self
    }

    /// Draws cell borders.
    pub fn with_bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    /// Uses reduced row padding.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Shows the loading view instead of rows.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Sets the message shown for an empty result.
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Sets the card/table breakpoint in pixels.
    pub fn with_mobile_breakpoint(mut self, breakpoint: u32) -> Self {
        self.mobile_breakpoint = breakpoint;
        self
    }

    /// Sets the resize debounce window.
    pub fn with_resize_debounce(mut self, debounce: Duration) -> Self {
        self.resize_debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the page-size selector choices. Zero entries are dropped and the
    /// list is sorted and deduplicated.
    pub fn with_page_size_options(mut self, options: impl IntoIterator<Item = usize>) -> Self {
        let mut options: Vec<usize> = options.into_iter().filter(|&n| n > 0).collect();
        options.sort_unstable();
        options.dedup();
        self.page_size_options = options;
        self
    }

    /// Chooses whether paging happens here or on the server.
    pub fn with_pagination_mode(mut self, mode: PaginationMode) -> Self {
        self.pagination_mode = mode;
        self
    }

    /// The resize debounce window.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_options_normalised() {
        let config = TableConfig::new().with_page_size_options([50, 0, 10, 50, 25]);
        assert_eq!(config.page_size_options, [10, 25, 50]);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: TableConfig =
            serde_json::from_str(r#"{"striped": true, "pagination_mode": "local"}"#).unwrap();
        assert!(config.striped);
        assert_eq!(config.pagination_mode, PaginationMode::Local);
        assert_eq!(config.empty_message, "No data");
        assert_eq!(config.resize_debounce(), Duration::from_millis(150));
    }

    #[test]
    fn test_huge_debounce_saturates() {
        let config = TableConfig::new().with_resize_debounce(Duration::MAX);
        assert_eq!(config.resize_debounce_ms, u64::MAX);
    }
}
