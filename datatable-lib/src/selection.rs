//! Row selection keyed by row id.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// Selection mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed.
    None,
    /// Single row selection (radio-button style).
    Single,
    /// Multiple rows can be selected (checkbox style).
    #[default]
    Multi,
}

/// Derived checkbox state for the "select all" header control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    /// Every visible row is selected (and there is at least one).
    pub all: bool,
    /// Something is selected but not every visible row.
    pub some: bool,
    /// Number of selected ids, visible or not.
    pub count: usize,
}

/// Selected row ids.
///
/// The caller owns this value. The table never edits it in place; it hands
/// back a modified copy through its selection callback.
///
/// # Example
///
/// ```
/// use datatable_lib::Selection;
///
/// let visible = ["a", "b"];
/// let selection = Selection::multi().toggled_all(&visible);
/// assert!(selection.is_all_selected(&visible));
///
/// let selection = selection.toggled_all(&visible);
/// assert!(selection.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub mode: SelectionMode,
    #[serde(default)]
    pub selected: BTreeSet<String>,
}

impl Selection {
    /// Create selection with no selection allowed.
    pub fn none() -> Self {
        Self {
            mode: SelectionMode::None,
            selected: BTreeSet::new(),
        }
    }

    /// Create single-selection mode.
    pub fn single() -> Self {
        Self {
            mode: SelectionMode::Single,
            selected: BTreeSet::new(),
        }
    }

    /// Create multi-selection mode.
    pub fn multi() -> Self {
        Self {
            mode: SelectionMode::Multi,
            selected: BTreeSet::new(),
        }
    }

    /// Start with the given ids selected (builder pattern).
    pub fn with_selected<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Toggle selection for an id. Returns true if selection changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let was_selected = self.selected.contains(id);
                self.selected.clear();
                if !was_selected {
                    self.selected.insert(id.to_string());
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(id) {
                    self.selected.insert(id.to_string());
                }
                true
            }
        }
    }

    /// Toggle every visible id in or out of the selection.
    ///
    /// When all visible ids are already selected they are removed; otherwise
    /// all of them are added. Ids outside `visible` are left alone. Only
    /// applies in multi mode. Returns true if selection changed.
    pub fn toggle_all<S: AsRef<str>>(&mut self, visible: &[S]) -> bool {
        if self.mode != SelectionMode::Multi || visible.is_empty() {
            return false;
        }
        if self.is_all_selected(visible) {
            for id in visible {
                self.selected.remove(id.as_ref());
            }
        } else {
            self.selected
                .extend(visible.iter().map(|id| id.as_ref().to_string()));
        }
        true
    }

    /// Copy of this selection with `id` toggled.
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.toggle(id);
        next
    }

    /// Copy of this selection with every visible id toggled.
    pub fn toggled_all<S: AsRef<str>>(&self, visible: &[S]) -> Self {
        let mut next = self.clone();
        next.toggle_all(visible);
        next
    }

    /// Check if an id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Every visible id is selected, and there is at least one.
    pub fn is_all_selected<S: AsRef<str>>(&self, visible: &[S]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id.as_ref()))
    }

    /// Something is selected, but not every visible row.
    pub fn is_some_selected<S: AsRef<str>>(&self, visible: &[S]) -> bool {
        !self.selected.is_empty() && !self.is_all_selected(visible)
    }

    /// Header checkbox state for the visible rows.
    pub fn summary<S: AsRef<str>>(&self, visible: &[S]) -> SelectionSummary {
        let all = self.is_all_selected(visible);
        SelectionSummary {
            all,
            some: !self.selected.is_empty() && !all,
            count: self.selected.len(),
        }
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Get the single selected id (for Single mode).
    pub fn get_single(&self) -> Option<&str> {
        self.selected.iter().next().map(String::as_str)
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
