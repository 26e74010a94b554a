//! Table UI state: paging, sorting, search, filters and column visibility.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view_options::ColumnVisibility;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single active sort: a column key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Local UI state of a data table.
///
/// Fields change only through the setters below. Changing the search text,
/// any filter, or the page size moves back to the first page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    page_index: usize,
    page_size: usize,
    sort: Option<SortState>,
    search: String,
    filters: BTreeMap<String, Value>,
    column_visibility: ColumnVisibility,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new()
    }
}

impl TableState {
    pub fn new() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            search: String::new(),
            filters: BTreeMap::new(),
            column_visibility: ColumnVisibility::default(),
        }
    }

    /// Start with a specific page size (clamped to at least 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Start with a sort already applied.
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Zero-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &BTreeMap<String, Value> {
        &self.filters
    }

    pub fn filter(&self, key: &str) -> Option<&Value> {
        self.filters.get(key)
    }

    pub fn column_visibility(&self) -> &ColumnVisibility {
        &self.column_visibility
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Set the page index. Returns `true` if it changed.
    pub fn set_page_index(&mut self, page_index: usize) -> bool {
        if self.page_index == page_index {
            return false;
        }
        self.page_index = page_index;
        true
    }

    /// Set the page size and go back to the first page.
    ///
    /// Returns `true` if anything changed.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        let changed = self.page_size != page_size || self.page_index != 0;
        self.page_size = page_size;
        self.page_index = 0;
        changed
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Toggle sort for a column key.
    ///
    /// If the key is already sorted, flips the direction. A different key
    /// replaces the previous sort and starts ascending.
    /// Returns the new sort state.
    pub fn toggle_sort(&mut self, key: &str) -> SortState {
        let next = match &self.sort {
            Some(current) if current.key == key => SortState {
                key: key.to_string(),
                direction: current.direction.toggled(),
            },
            _ => SortState::asc(key),
        };
        self.sort = Some(next.clone());
        next
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    /// Replace the search text and go back to the first page.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page_index = 0;
    }

    /// Set a filter and go back to the first page.
    ///
    /// `null` and empty-string values remove the filter.
    pub fn set_filter(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let is_empty = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if is_empty {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self.page_index = 0;
    }

    /// Remove a filter. Returns `true` (and resets paging) if it was set.
    pub fn clear_filter(&mut self, key: &str) -> bool {
        if self.filters.remove(key).is_some() {
            self.page_index = 0;
            true
        } else {
            false
        }
    }

    /// Remove every filter. Returns `true` (and resets paging) if any was set.
    pub fn clear_filters(&mut self) -> bool {
        if self.filters.is_empty() {
            return false;
        }
        self.filters.clear();
        self.page_index = 0;
        true
    }

    // -------------------------------------------------------------------------
    // Column visibility
    // -------------------------------------------------------------------------

    pub fn set_column_visibility(&mut self, visibility: ColumnVisibility) {
        self.column_visibility = visibility;
    }

    pub(crate) fn column_visibility_mut(&mut self) -> &mut ColumnVisibility {
        &mut self.column_visibility
    }
}
