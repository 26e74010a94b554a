//! Column schema and the row trait for table display.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Custom cell renderer. Receives the raw column value and the whole row.
pub type CellRenderer<T> = Arc<dyn Fn(&Value, &T) -> String + Send + Sync>;

/// Errors raised while building a column set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Two columns share the same key.
    #[error("Duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// A column was declared with an empty key.
    #[error("Column key must not be empty")]
    EmptyKey,
}

/// Trait for records that can be displayed as rows in a [`DataTable`](super::DataTable).
///
/// # Examples
///
/// ```ignore
/// impl TableRow for Project {
///     fn id(&self) -> String { self.id.to_string() }
///
///     fn value(&self, key: &str) -> Value {
///         match key {
///             "nombre" => Value::from(self.nombre.clone()),
///             "estado" => Value::from(self.estado),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Unique identifier for this row.
    fn id(&self) -> String;

    /// Raw value for an accessor key. Unknown keys yield `Value::Null`.
    fn value(&self, key: &str) -> Value;

    /// Overwrite the value behind an accessor key.
    ///
    /// Used by owning pages to rewrite a row during an optimistic update.
    /// Returns `false` when the row does not support writing that key.
    fn set_value(&mut self, _key: &str, _value: Value) -> bool {
        false
    }

    /// Whether the row carries a value for `key` at all.
    fn contains_key(&self, key: &str) -> bool {
        !self.value(key).is_null()
    }

    /// Drop the value behind an accessor key, undoing a `set_value` that
    /// introduced it. Returns `false` when unsupported.
    fn remove_value(&mut self, _key: &str) -> bool {
        false
    }
}

/// JSON objects are rows out of the box. Accessor keys may use dots to reach
/// into nested objects (`"responsable.nombre"`).
impl TableRow for Value {
    fn id(&self) -> String {
        match self.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn value(&self, key: &str) -> Value {
        key.split('.')
            .try_fold(self, |current, part| current.get(part))
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_value(&mut self, key: &str, value: Value) -> bool {
        let mut current = self;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            let Some(object) = current.as_object_mut() else {
                return false;
            };
            if parts.peek().is_none() {
                object.insert(part.to_string(), value);
                return true;
            }
            let Some(next) = object.get_mut(part) else {
                return false;
            };
            current = next;
        }
        false
    }

    fn contains_key(&self, key: &str) -> bool {
        key.split('.')
            .try_fold(self, |current, part| current.get(part))
            .is_some()
    }

    fn remove_value(&mut self, key: &str) -> bool {
        let (parent, last) = match key.rsplit_once('.') {
            Some((parent, last)) => (
                parent
                    .split('.')
                    .try_fold(self, |current, part| current.get_mut(part)),
                last,
            ),
            None => (Some(self), key),
        };
        parent
            .and_then(Value::as_object_mut)
            .is_some_and(|object| object.remove(last).is_some())
    }
}

/// Plain display string for a raw value.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Column descriptor.
///
/// # Examples
///
/// ```ignore
/// let columns = vec![
///     ColumnDef::new("nombre", "Nombre").sortable(),
///     ColumnDef::new("responsable", "Responsable").accessor("responsable.nombre"),
///     ColumnDef::new("estado", "Estado").cell(|value, _row| {
///         if value.as_bool() == Some(true) { "Activo" } else { "Inactivo" }.to_string()
///     }),
/// ];
/// ```
pub struct ColumnDef<T> {
    /// Column key, unique within a column set.
    pub key: String,
    /// Header text.
    pub header: String,
    /// Field the raw value is read from. Falls back to `key`.
    pub accessor_key: Option<String>,
    /// Whether clicking the header changes the sort.
    pub sortable: bool,
    /// Initial visibility.
    pub visible: bool,
    /// Custom renderer. When set it is the only source of the cell text.
    pub cell: Option<CellRenderer<T>>,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            accessor_key: self.accessor_key.clone(),
            sortable: self.sortable,
            visible: self.visible,
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("accessor_key", &self.accessor_key)
            .field("sortable", &self.sortable)
            .field("visible", &self.visible)
            .field("cell", &self.cell.as_ref().map(|_| "<renderer>"))
            .finish()
    }
}

impl<T: TableRow> ColumnDef<T> {
    /// Create a visible, non-sortable column.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            accessor_key: None,
            sortable: false,
            visible: true,
            cell: None,
        }
    }

    /// Read the raw value from a different field than the column key.
    pub fn accessor(mut self, accessor_key: impl Into<String>) -> Self {
        self.accessor_key = Some(accessor_key.into());
        self
    }

    /// Make the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Start with the column hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Set a custom cell renderer.
    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value, &T) -> String + Send + Sync + 'static,
    {
        self.cell = Some(Arc::new(render));
        self
    }

    /// Field used for reading values and for server-side sorting.
    pub fn field(&self) -> &str {
        self.accessor_key.as_deref().unwrap_or(&self.key)
    }

    /// Raw value of this column for a row.
    pub fn raw_value(&self, row: &T) -> Value {
        row.value(self.field())
    }

    /// Rendered cell text for a row.
    pub fn render(&self, row: &T) -> String {
        let value = self.raw_value(row);
        match &self.cell {
            Some(render) => render(&value, row),
            None => display_value(&value),
        }
    }
}

/// An ordered set of columns with unique keys.
#[derive(Debug, Clone)]
pub struct ColumnSet<T> {
    columns: Vec<ColumnDef<T>>,
}

impl<T: TableRow> ColumnSet<T> {
    /// Build a column set, rejecting empty or duplicate keys.
    pub fn new(columns: Vec<ColumnDef<T>>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.key.is_empty() {
                return Err(SchemaError::EmptyKey);
            }
            if !seen.insert(column.key.as_str()) {
                return Err(SchemaError::DuplicateKey {
                    key: column.key.clone(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Get a column by key.
    pub fn get(&self, key: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Check whether a key belongs to this set.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate the columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns.iter()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the set has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
