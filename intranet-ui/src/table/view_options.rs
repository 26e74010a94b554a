//! Column visibility (the table's "view options" menu).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::column::{ColumnSet, TableRow};

/// Mapping from column key to visibility.
///
/// Keys without an entry are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    /// Initial visibility for a column set: every column gets an explicit
    /// entry, `false` only for columns declared hidden.
    pub fn from_columns<T: TableRow>(columns: &ColumnSet<T>) -> Self {
        Self(
            columns
                .iter()
                .map(|c| (c.key.clone(), c.visible))
                .collect(),
        )
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(true)
    }

    pub fn set(&mut self, key: impl Into<String>, visible: bool) {
        self.0.insert(key.into(), visible);
    }

    /// Flip one key. Returns the key's new visibility.
    pub fn toggle(&mut self, key: &str) -> bool {
        let visible = !self.is_visible(key);
        self.0.insert(key.to_string(), visible);
        visible
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.0
    }

    /// One checkbox entry per column, in column order.
    pub fn entries<T: TableRow>(&self, columns: &ColumnSet<T>) -> Vec<ViewOptionEntry> {
        columns
            .iter()
            .map(|c| ViewOptionEntry {
                key: c.key.clone(),
                header: c.header.clone(),
                checked: self.is_visible(&c.key),
            })
            .collect()
    }
}

/// A single checkbox in the view-options dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptionEntry {
    pub key: String,
    pub header: String,
    pub checked: bool,
}
