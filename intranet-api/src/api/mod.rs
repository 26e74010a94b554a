//! Resource operations
//!
//! [`ResourceApi`] is the seam between pages and the backend: the
//! [`PanelClient`](crate::PanelClient) implements it over HTTP, tests
//! implement it in memory.

mod query;
mod response;

use async_trait::async_trait;
use serde_json::Value;

pub use query::ListQuery;
pub use response::ListResponse;
pub use response::PageInfo;

use crate::error::Error;

/// CRUD operations on a named backend resource.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// `GET /{resource}?page=..&limit=..`
    async fn list(&self, resource: &str, query: &ListQuery) -> Result<ListResponse<Value>, Error>;

    /// `GET /{resource}/{id}`. Missing records yield `ApiError::NotFound`.
    async fn get(&self, resource: &str, id: &str) -> Result<Value, Error>;

    /// `POST /{resource}`
    async fn create(&self, resource: &str, body: Value) -> Result<Value, Error>;

    /// `PUT /{resource}/{id}` with only the changed fields.
    async fn update(&self, resource: &str, id: &str, changes: Value) -> Result<Value, Error>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, resource: &str, id: &str) -> Result<(), Error>;

    /// `POST /{resource}/{id}/copy` with `{ "newName": .. }`
    async fn copy(&self, resource: &str, id: &str, new_name: &str) -> Result<Value, Error>;
}
