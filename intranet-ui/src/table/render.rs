//! Render model produced by the data table.

use super::events::RowAction;
use super::pagination::Pagination;
use super::state::SortDirection;

/// Placeholder text while rows are loading.
pub const LOADING_TEXT: &str = "Cargando...";

/// Text shown when there are no rows.
pub const EMPTY_TEXT: &str = "No se encontraron resultados.";

/// One header cell of a visible column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    /// Direction indicator when this column holds the active sort.
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    /// Header text with a sort indicator.
    pub fn title(&self) -> String {
        match self.sort {
            Some(SortDirection::Asc) => format!("{} ▲", self.header),
            Some(SortDirection::Desc) => format!("{} ▼", self.header),
            None => self.header.clone(),
        }
    }
}

/// One rendered body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub key: String,
    pub text: String,
}

/// A body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyRow {
    /// Full-width placeholder while loading.
    Loading { colspan: usize, message: &'static str },
    /// Full-width "no results" row.
    Empty { colspan: usize, message: &'static str },
    /// A data row.
    Data {
        id: String,
        cells: Vec<CellView>,
        actions: Vec<RowAction>,
    },
}

/// Everything needed to draw a table for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    /// Whether a trailing actions column is drawn.
    pub actions_column: bool,
    pub rows: Vec<BodyRow>,
    pub pagination: Pagination,
}

impl TableView {
    /// Number of columns a full-width row spans.
    pub fn colspan(&self) -> usize {
        self.headers.len() + usize::from(self.actions_column)
    }

    /// Ids of the data rows, in display order.
    pub fn row_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                BodyRow::Data { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}
