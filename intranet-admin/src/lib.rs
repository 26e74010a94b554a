//! Intranet admin panel
//!
//! Page controllers that connect the headless widgets of `intranet-ui` to
//! the REST backend, plus configuration and logging setup.

pub mod config;
pub mod logging;
pub mod pages;
pub mod paths;

pub use config::ConfigError;
pub use config::PanelConfig;
pub use pages::FormPage;
pub use pages::ListPage;
