//! Schema-driven data table.
//!
//! The table owns only local UI state (paging, sort, search, filters, column
//! visibility). Rows, total count and the loading flag belong to the owning
//! page and are passed in at render time. Every interaction returns the
//! [`TableEvent`] the owner should act on; nothing is fetched or sorted here.

mod column;
mod events;
mod pagination;
mod render;
mod state;
mod view_options;

use serde_json::Value;

pub use column::{CellRenderer, ColumnDef, ColumnSet, SchemaError, TableRow, display_value};
pub use events::{RowAction, TableEvent};
pub use pagination::{PAGE_SIZE_OPTIONS, Pagination};
pub use render::{BodyRow, CellView, EMPTY_TEXT, HeaderCell, LOADING_TEXT, TableView};
pub use state::{DEFAULT_PAGE_SIZE, SortDirection, SortState, TableState};
pub use view_options::{ColumnVisibility, ViewOptionEntry};

/// A data table over rows of type `T`.
///
/// # Example
///
/// ```ignore
/// let columns = ColumnSet::new(vec![
///     ColumnDef::new("nombre", "Nombre").sortable(),
///     ColumnDef::new("estado", "Estado"),
/// ])?;
/// let mut table = DataTable::new(columns).with_row_actions([RowAction::Edit]);
///
/// if let Some(event) = table.click_header("nombre") {
///     page.handle(event).await;
/// }
/// let view = table.render(&rows, total_count, loading);
/// ```
#[derive(Debug, Clone)]
pub struct DataTable<T: TableRow> {
    columns: ColumnSet<T>,
    state: TableState,
    row_actions: Vec<RowAction>,
}

impl<T: TableRow> DataTable<T> {
    /// Create a table with default state; visibility comes from the columns.
    pub fn new(columns: ColumnSet<T>) -> Self {
        let mut state = TableState::new();
        state.set_column_visibility(ColumnVisibility::from_columns(&columns));
        Self {
            columns,
            state,
            row_actions: Vec::new(),
        }
    }

    /// Replace the initial state (for tables whose state is lifted to the owner).
    pub fn with_state(mut self, state: TableState) -> Self {
        self.set_state(state);
        self
    }

    /// Set the per-row actions. Duplicates are dropped.
    pub fn with_row_actions(mut self, actions: impl IntoIterator<Item = RowAction>) -> Self {
        self.row_actions.clear();
        for action in actions {
            if !self.row_actions.contains(&action) {
                self.row_actions.push(action);
            }
        }
        self
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    /// Overwrite the state from the owner (controlled mode).
    ///
    /// Columns the incoming visibility does not mention keep their
    /// declared default.
    pub fn set_state(&mut self, state: TableState) {
        self.state = state;
        let visibility = self.state.column_visibility_mut();
        for column in self.columns.iter() {
            if !visibility.as_map().contains_key(&column.key) {
                visibility.set(column.key.as_str(), column.visible);
            }
        }
    }

    pub fn row_actions(&self) -> &[RowAction] {
        &self.row_actions
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Columns currently shown, in declaration order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        let visibility = self.state.column_visibility();
        self.columns
            .iter()
            .filter(move |c| visibility.is_visible(&c.key))
    }

    /// Width of a full-width row: visible columns plus the actions column.
    pub fn colspan(&self) -> usize {
        self.visible_columns().count() + usize::from(!self.row_actions.is_empty())
    }

    /// Entries for the view-options dropdown.
    pub fn view_options(&self) -> Vec<ViewOptionEntry> {
        self.state.column_visibility().entries(&self.columns)
    }

    /// Flip a column's visibility. Unknown keys are ignored.
    pub fn toggle_column(&mut self, key: &str) -> Option<TableEvent> {
        if !self.columns.contains(key) {
            return None;
        }
        let visibility = self.state.column_visibility_mut();
        let visible = visibility.toggle(key);
        log::debug!("[table] column '{}' visible={}", key, visible);
        Some(TableEvent::VisibilityChange(visibility.clone()))
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Handle a header click.
    ///
    /// Only sortable columns respond. Returns the new sort intent.
    pub fn click_header(&mut self, key: &str) -> Option<TableEvent> {
        let sortable = self.columns.get(key).is_some_and(|c| c.sortable);
        if !sortable {
            return None;
        }
        let sort = self.state.toggle_sort(key);
        log::debug!("[table] sort {} {}", sort.key, sort.direction);
        Some(TableEvent::SortChange(Some(sort)))
    }

    /// Drop the active sort.
    pub fn clear_sort(&mut self) -> Option<TableEvent> {
        self.state.sort()?;
        self.state.clear_sort();
        Some(TableEvent::SortChange(None))
    }

    // -------------------------------------------------------------------------
    // Search and filters
    // -------------------------------------------------------------------------

    /// Search text changed. Emitted on every change, without debounce.
    pub fn search(&mut self, text: impl Into<String>) -> TableEvent {
        self.state.set_search(text);
        TableEvent::Search(self.state.search().to_string())
    }

    /// Set a filter value (`null` or `""` clears it).
    pub fn set_filter(&mut self, key: impl Into<String>, value: Value) -> TableEvent {
        self.state.set_filter(key, value);
        TableEvent::FilterChange(self.state.filters().clone())
    }

    pub fn clear_filter(&mut self, key: &str) -> Option<TableEvent> {
        self.state
            .clear_filter(key)
            .then(|| TableEvent::FilterChange(self.state.filters().clone()))
    }

    /// Drop every filter ("Limpiar filtros").
    pub fn clear_filters(&mut self) -> Option<TableEvent> {
        self.state
            .clear_filters()
            .then(|| TableEvent::FilterChange(self.state.filters().clone()))
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Pagination for the given total row count.
    pub fn pagination(&self, total_count: usize) -> Pagination {
        Pagination::new(self.state.page_index(), self.state.page_size(), total_count)
    }

    /// Jump to a page. Out-of-range indexes are ignored.
    pub fn go_to_page(&mut self, page_index: usize, total_count: usize) -> Option<TableEvent> {
        let page_count = self.pagination(total_count).page_count();
        if page_index >= page_count.max(1) {
            return None;
        }
        self.state
            .set_page_index(page_index)
            .then_some(TableEvent::PageChange(page_index))
    }

    pub fn first_page(&mut self, total_count: usize) -> Option<TableEvent> {
        let target = self.pagination(total_count).first()?;
        self.go_to_page(target, total_count)
    }

    pub fn previous_page(&mut self, total_count: usize) -> Option<TableEvent> {
        let target = self.pagination(total_count).previous()?;
        self.go_to_page(target, total_count)
    }

    pub fn next_page(&mut self, total_count: usize) -> Option<TableEvent> {
        let target = self.pagination(total_count).next()?;
        self.go_to_page(target, total_count)
    }

    pub fn last_page(&mut self, total_count: usize) -> Option<TableEvent> {
        let target = self.pagination(total_count).last()?;
        self.go_to_page(target, total_count)
    }

    /// Change the page size; the page index goes back to 0.
    pub fn set_page_size(&mut self, page_size: usize) -> Option<TableEvent> {
        self.state
            .set_page_size(page_size)
            .then(|| TableEvent::PageSizeChange(self.state.page_size()))
    }

    // -------------------------------------------------------------------------
    // Row actions
    // -------------------------------------------------------------------------

    /// A row action was picked. Only configured actions are emitted.
    pub fn row_action(&self, row_id: impl Into<String>, action: RowAction) -> Option<TableEvent> {
        self.row_actions.contains(&action).then(|| TableEvent::RowAction {
            row_id: row_id.into(),
            action,
        })
    }

    // -------------------------------------------------------------------------
    // Render
    // -------------------------------------------------------------------------

    /// Build the render model for the owner's rows.
    pub fn render(&self, data: &[T], total_count: usize, is_loading: bool) -> TableView {
        let sort = self.state.sort();
        let headers = self
            .visible_columns()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                header: c.header.clone(),
                sortable: c.sortable,
                sort: sort.filter(|s| s.key == c.key).map(|s| s.direction),
            })
            .collect();

        let colspan = self.colspan();
        let rows = if is_loading {
            vec![BodyRow::Loading {
                colspan,
                message: LOADING_TEXT,
            }]
        } else if data.is_empty() {
            vec![BodyRow::Empty {
                colspan,
                message: EMPTY_TEXT,
            }]
        } else {
            data.iter()
                .map(|row| BodyRow::Data {
                    id: row.id(),
                    cells: self
                        .visible_columns()
                        .map(|c| CellView {
                            key: c.key.clone(),
                            text: c.render(row),
                        })
                        .collect(),
                    actions: self.row_actions.clone(),
                })
                .collect()
        };

        TableView {
            headers,
            actions_column: !self.row_actions.is_empty(),
            rows,
            pagination: self.pagination(total_count),
        }
    }
}
