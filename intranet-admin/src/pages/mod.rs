//! Page controllers
//!
//! Pages own server state and talk to the backend through
//! [`ResourceApi`](intranet_api::api::ResourceApi); the widgets they wrap
//! only hold UI state.

mod form;
mod list;

pub use form::FormDefinition;
pub use form::FormPage;
pub use form::FormStatus;
pub use form::NOT_FOUND_MESSAGE;
pub use form::SUBMITTED_MESSAGE;
pub use form::SubmitOutcome;
pub use list::ListPage;
pub use list::REVERT_TOAST_DURATION;
