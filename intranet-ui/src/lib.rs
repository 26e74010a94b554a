//! Headless widgets for the intranet admin panel.
//!
//! Everything in this crate is pure UI state: the data table (with its
//! pagination and view-options pieces), the dynamic question form, toast
//! notifications and the optimistic row-update tracker. Nothing here touches
//! the network; owning pages feed data in and consume the emitted events.

pub mod form;
pub mod table;
pub mod toast;
pub mod updates;

pub mod prelude {
    pub use crate::form::{
        Answer, AnswerMap, ChoiceOption, DynamicForm, FieldError, FileAttachment, FormError,
        OptionId, Question, QuestionId, QuestionKind, QuestionView, ValidationResult, Widget,
    };
    pub use crate::table::{
        BodyRow, ColumnDef, ColumnSet, ColumnVisibility, DataTable, HeaderCell, Pagination,
        RowAction, SchemaError, SortDirection, SortState, TableEvent, TableRow, TableState,
        TableView, ViewOptionEntry,
    };
    pub use crate::toast::{Toast, ToastLevel};
    pub use crate::updates::{RowUpdate, RowUpdateError, RowUpdates, UpdatePhase};
}
