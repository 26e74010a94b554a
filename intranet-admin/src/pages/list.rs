//! List page: a data table backed by a resource endpoint.

use std::mem;
use std::time::Duration;

use intranet_api::api::ListQuery;
use intranet_api::api::ListResponse;
use intranet_api::api::ResourceApi;
use intranet_api::error::Error;
use intranet_ui::table::DataTable;
use intranet_ui::table::RowAction;
use intranet_ui::table::TableEvent;
use intranet_ui::table::TableRow;
use intranet_ui::table::TableView;
use intranet_ui::table::display_value;
use intranet_ui::toast::Toast;
use intranet_ui::updates::RowUpdateError;
use intranet_ui::updates::RowUpdates;
use intranet_ui::updates::UpdatePhase;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

/// Field used to name copies.
const NAME_FIELD: &str = "nombre";

/// How long the toast for a reverted edit stays up.
pub const REVERT_TOAST_DURATION: Duration = Duration::from_secs(8);

/// Owns the server state of one list screen: rows, total count, loading
/// flag and pending toasts. The table only holds UI state.
///
/// # Example
///
/// ```ignore
/// let mut page = ListPage::new(client, "proyectos", table);
/// page.refresh().await;
///
/// page.interact(|table, total| table.next_page(total)).await;
/// page.toggle_field("42", "estado").await?;
///
/// // Or drive the phases yourself to render the loading row:
/// let query = page.begin_refresh();
/// draw(page.view());
/// let result = client.list("proyectos", &query).await;
/// page.finish_refresh(result);
///
/// for toast in page.take_toasts() {
///     show(toast);
/// }
/// ```
pub struct ListPage<T: TableRow, A: ResourceApi> {
    api: A,
    resource: String,
    table: DataTable<T>,
    rows: Vec<T>,
    total_count: usize,
    loading: bool,
    /// `None` marks a field the row did not carry before the edit.
    updates: RowUpdates<Option<Value>>,
    toasts: Vec<Toast>,
}

impl<T, A> ListPage<T, A>
where
    T: TableRow + DeserializeOwned,
    A: ResourceApi,
{
    pub fn new(api: A, resource: impl Into<String>, table: DataTable<T>) -> Self {
        Self {
            api,
            resource: resource.into(),
            table,
            rows: Vec::new(),
            total_count: 0,
            loading: false,
            updates: RowUpdates::new(),
            toasts: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn table(&self) -> &DataTable<T> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DataTable<T> {
        &mut self.table
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row(&self, row_id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == row_id)
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn updates(&self) -> &RowUpdates<Option<Value>> {
        &self.updates
    }

    /// Toasts queued since the last call.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        mem::take(&mut self.toasts)
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Render model for the current rows.
    pub fn view(&self) -> TableView {
        self.table.render(&self.rows, self.total_count, self.loading)
    }

    /// Backend query for the current table state. Pages are one-based on
    /// the wire; sorting uses the column's accessor field.
    pub fn query(&self) -> ListQuery {
        let state = self.table.state();
        let mut query = ListQuery::new(state.page_index() + 1, state.page_size())
            .search(state.search());

        for (key, value) in state.filters() {
            query = query.filter(key.as_str(), display_value(value));
        }

        if let Some(sort) = state.sort() {
            let field = self
                .table
                .columns()
                .get(&sort.key)
                .map_or(sort.key.as_str(), |c| c.field());
            query = query.sort(field, sort.direction.as_str());
        }

        query
    }

    /// Fetch the current page. Failures become an error toast and leave
    /// the previous rows in place.
    ///
    /// If the current page no longer exists (e.g. after deleting the last
    /// row of the last page) the table moves to the last page and fetches
    /// again.
    pub async fn refresh(&mut self) {
        let query = self.begin_refresh();
        let result = self.api.list(&self.resource, &query).await;
        if self.finish_refresh(result) {
            let query = self.begin_refresh();
            let result = self.api.list(&self.resource, &query).await;
            self.finish_refresh(result);
        }
    }

    /// Mark the page as loading and return the query to send.
    pub fn begin_refresh(&mut self) -> ListQuery {
        let query = self.query();
        self.loading = true;
        log::debug!("[list] fetching {} {:?}", self.resource, query);
        query
    }

    /// Apply the outcome of the query from [`begin_refresh`](Self::begin_refresh).
    ///
    /// Returns `true` when the current page turned out to be past the end
    /// and the table moved to the last page; the caller should fetch again.
    pub fn finish_refresh(&mut self, result: Result<ListResponse<Value>, Error>) -> bool {
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log::warn!("[list] failed to load {}: {}", self.resource, e);
                self.toasts.push(Toast::error(e.user_message()));
                return false;
            }
        };

        match response.into_typed::<T>() {
            Ok(page) => {
                self.total_count = page.total_count();
                self.rows = page.data;
                self.updates.clear_settled();
            }
            Err(e) => {
                log::warn!("[list] unexpected rows from {}: {}", self.resource, e);
                self.toasts
                    .push(Toast::error("Respuesta inesperada del servidor"));
                return false;
            }
        }

        let pagination = self.table.pagination(self.total_count);
        if self.rows.is_empty()
            && pagination.page_count() > 0
            && pagination.page_index() >= pagination.page_count()
        {
            let last = pagination.page_count() - 1;
            return self.table.go_to_page(last, self.total_count).is_some();
        }
        false
    }

    /// React to a table intent.
    ///
    /// Returns the row id when the user chose to edit a row; navigation is
    /// up to the caller.
    pub async fn handle(&mut self, event: TableEvent) -> Option<String> {
        match event {
            TableEvent::PageChange(_)
            | TableEvent::PageSizeChange(_)
            | TableEvent::SortChange(_)
            | TableEvent::Search(_)
            | TableEvent::FilterChange(_) => {
                self.refresh().await;
                None
            }
            TableEvent::VisibilityChange(_) => None,
            TableEvent::RowAction { row_id, action } => match action {
                RowAction::Edit => Some(row_id),
                RowAction::Delete => {
                    self.delete_row(&row_id).await;
                    None
                }
                RowAction::Copy => {
                    self.copy_row(&row_id).await;
                    None
                }
            },
        }
    }

    /// Run a table interaction and handle the event it emits, if any.
    pub async fn interact<F>(&mut self, action: F) -> Option<String>
    where
        F: FnOnce(&mut DataTable<T>, usize) -> Option<TableEvent>,
    {
        let event = action(&mut self.table, self.total_count)?;
        self.handle(event).await
    }

    /// Delete a row and reload the page.
    pub async fn delete_row(&mut self, row_id: &str) -> bool {
        match self.api.delete(&self.resource, row_id).await {
            Ok(()) => {
                log::info!("[list] deleted {}/{}", self.resource, row_id);
                self.toasts.push(Toast::success("Registro eliminado"));
                self.refresh().await;
                true
            }
            Err(e) => {
                log::warn!("[list] delete {}/{} failed: {}", self.resource, row_id, e);
                self.toasts.push(Toast::error(e.user_message()));
                false
            }
        }
    }

    /// Copy a row as "Copia de <nombre>" and reload the page.
    pub async fn copy_row(&mut self, row_id: &str) -> bool {
        let name = self
            .row(row_id)
            .map(|row| display_value(&row.value(NAME_FIELD)))
            .unwrap_or_default();
        let new_name = if name.is_empty() {
            "Copia".to_string()
        } else {
            format!("Copia de {}", name)
        };

        match self.api.copy(&self.resource, row_id, &new_name).await {
            Ok(_) => {
                log::info!("[list] copied {}/{} as '{}'", self.resource, row_id, new_name);
                self.toasts.push(Toast::success("Registro copiado"));
                self.refresh().await;
                true
            }
            Err(e) => {
                log::warn!("[list] copy {}/{} failed: {}", self.resource, row_id, e);
                self.toasts.push(Toast::error(e.user_message()));
                false
            }
        }
    }

    /// Optimistically set `field` on a row, then persist it.
    ///
    /// The row is rewritten immediately. If the server rejects the change
    /// the previous value is written back and an error toast is queued.
    /// A row with an update still in flight refuses a second one.
    pub async fn update_field(
        &mut self,
        row_id: &str,
        field: &str,
        value: Value,
    ) -> Result<UpdatePhase, RowUpdateError> {
        let changes = self.begin_update(row_id, field, value)?;
        let result = self.api.update(&self.resource, row_id, changes).await;
        self.finish_update(row_id, field, result)
    }

    /// Rewrite the row and record the pending update. Returns the request
    /// body to send.
    pub fn begin_update(
        &mut self,
        row_id: &str,
        field: &str,
        value: Value,
    ) -> Result<Value, RowUpdateError> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id() == row_id)
            .ok_or_else(|| RowUpdateError::UnknownRow(row_id.to_string()))?;

        if self.updates.is_pending(row_id) {
            return Err(RowUpdateError::InFlight(row_id.to_string()));
        }

        let row = &self.rows[index];
        let previous = row.contains_key(field).then(|| row.value(field));
        let mut updated = row.clone();
        if !updated.set_value(field, value.clone()) {
            return Err(RowUpdateError::ReadOnlyField {
                row_id: row_id.to_string(),
                field: field.to_string(),
            });
        }

        self.updates.begin(row_id, previous, Some(value.clone()))?;
        self.rows[index] = updated;
        Ok(changed_fields(field, value))
    }

    /// Settle the update started by [`begin_update`](Self::begin_update).
    pub fn finish_update(
        &mut self,
        row_id: &str,
        field: &str,
        result: Result<Value, Error>,
    ) -> Result<UpdatePhase, RowUpdateError> {
        match result {
            Ok(_) => {
                self.updates.commit(row_id)?;
                log::debug!("[list] {}/{} {} committed", self.resource, row_id, field);
                Ok(UpdatePhase::Committed)
            }
            Err(e) => {
                let previous = self.updates.revert(row_id)?;
                if let Some(row) = self.rows.iter_mut().find(|r| r.id() == row_id) {
                    match previous {
                        Some(value) => row.set_value(field, value),
                        None => row.remove_value(field),
                    };
                }
                log::warn!(
                    "[list] {}/{} {} reverted: {}",
                    self.resource,
                    row_id,
                    field,
                    e
                );
                self.toasts.push(
                    Toast::error(format!("No se pudo actualizar: {}", e.user_message()))
                        .with_duration(REVERT_TOAST_DURATION),
                );
                Ok(UpdatePhase::Reverted)
            }
        }
    }

    /// Flip a boolean field (e.g. `estado`). Missing values count as `false`.
    pub async fn toggle_field(
        &mut self,
        row_id: &str,
        field: &str,
    ) -> Result<UpdatePhase, RowUpdateError> {
        let current = self
            .row(row_id)
            .ok_or_else(|| RowUpdateError::UnknownRow(row_id.to_string()))?
            .value(field)
            .as_bool()
            .unwrap_or(false);
        self.update_field(row_id, field, Value::Bool(!current)).await
    }
}

/// Request body carrying only `field`. Dotted paths become nested objects.
fn changed_fields(field: &str, value: Value) -> Value {
    field.rsplit('.').fold(value, |inner, part| {
        let mut object = Map::new();
        object.insert(part.to_string(), inner);
        Value::Object(object)
    })
}
