//! REST client for the intranet backend.
//!
//! Lists, reads and mutates resources (`proyectos`, `tareas`, `formularios`...)
//! with a bearer token read from the session cookie.

pub mod api;
pub mod auth;
pub mod error;

mod client;
mod execute;

pub use client::*;
