//! Events emitted by the data table.

use std::collections::BTreeMap;

use serde_json::Value;

use super::state::SortState;
use super::view_options::ColumnVisibility;

/// Per-row contextual operation offered in the row menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    Edit,
    Delete,
    Copy,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Editar",
            Self::Delete => "Eliminar",
            Self::Copy => "Copiar",
        }
    }
}

/// An intent emitted by the table for its owner to act on.
///
/// The table never fetches data; the owner reacts to these events.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    /// Zero-based page index to show.
    PageChange(usize),
    /// New page size. The page index has already been reset to 0.
    PageSizeChange(usize),
    /// New sort; rows must be re-fetched in that order.
    SortChange(Option<SortState>),
    /// Search text changed.
    Search(String),
    /// Full filter map after the change.
    FilterChange(BTreeMap<String, Value>),
    /// Full visibility mapping after a column was toggled.
    VisibilityChange(ColumnVisibility),
    /// A row action was chosen.
    RowAction { row_id: String, action: RowAction },
}
