//! Optimistic row updates.
//!
//! Each row moves through `Pending -> Committed | Reverted`. A row with a
//! pending update refuses a second one until the first settles, so a late
//! response can never overwrite a newer request.

use std::collections::HashMap;

/// Lifecycle of one optimistic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePhase {
    /// Applied locally, waiting for the server.
    Pending,
    /// Server accepted the change.
    Committed,
    /// Server rejected the change; the previous value was restored.
    Reverted,
}

/// One tracked update.
#[derive(Debug, Clone, PartialEq)]
pub struct RowUpdate<V> {
    pub row_id: String,
    pub previous: V,
    pub next: V,
    pub phase: UpdatePhase,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowUpdateError {
    /// The row already has an update waiting for the server.
    #[error("Row '{0}' already has an update in flight")]
    InFlight(String),

    /// `commit`/`revert` without a pending update.
    #[error("No pending update for row '{0}'")]
    NotPending(String),

    /// The row is not on the current page.
    #[error("Row '{0}' not found")]
    UnknownRow(String),

    /// The row type cannot write this field.
    #[error("Field '{field}' cannot be updated on row '{row_id}'")]
    ReadOnlyField { row_id: String, field: String },
}

/// Tracks optimistic updates per row id.
#[derive(Debug, Clone)]
pub struct RowUpdates<V> {
    updates: HashMap<String, RowUpdate<V>>,
}

impl<V: Clone> Default for RowUpdates<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> RowUpdates<V> {
    pub fn new() -> Self {
        Self {
            updates: HashMap::new(),
        }
    }

    /// Start an update. Fails if the row already has one pending.
    pub fn begin(
        &mut self,
        row_id: impl Into<String>,
        previous: V,
        next: V,
    ) -> Result<&RowUpdate<V>, RowUpdateError> {
        let row_id = row_id.into();
        if self.is_pending(&row_id) {
            return Err(RowUpdateError::InFlight(row_id));
        }
        let update = RowUpdate {
            row_id: row_id.clone(),
            previous,
            next,
            phase: UpdatePhase::Pending,
        };
        self.updates.insert(row_id.clone(), update);
        self.updates
            .get(&row_id)
            .ok_or(RowUpdateError::NotPending(row_id))
    }

    fn settle(&mut self, row_id: &str, phase: UpdatePhase) -> Result<&RowUpdate<V>, RowUpdateError> {
        match self.updates.get_mut(row_id) {
            Some(update) if update.phase == UpdatePhase::Pending => {
                update.phase = phase;
                Ok(&*update)
            }
            _ => Err(RowUpdateError::NotPending(row_id.to_string())),
        }
    }

    /// The server accepted the change. Returns the committed value.
    pub fn commit(&mut self, row_id: &str) -> Result<V, RowUpdateError> {
        self.settle(row_id, UpdatePhase::Committed)
            .map(|u| u.next.clone())
    }

    /// The server rejected the change. Returns the value to write back.
    pub fn revert(&mut self, row_id: &str) -> Result<V, RowUpdateError> {
        self.settle(row_id, UpdatePhase::Reverted)
            .map(|u| u.previous.clone())
    }

    pub fn get(&self, row_id: &str) -> Option<&RowUpdate<V>> {
        self.updates.get(row_id)
    }

    pub fn phase(&self, row_id: &str) -> Option<UpdatePhase> {
        self.updates.get(row_id).map(|u| u.phase)
    }

    pub fn is_pending(&self, row_id: &str) -> bool {
        self.phase(row_id) == Some(UpdatePhase::Pending)
    }

    /// Drop settled entries (e.g. after the page reloads).
    pub fn clear_settled(&mut self) {
        self.updates.retain(|_, u| u.phase == UpdatePhase::Pending);
    }
}
