//! List response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total rows across all pages.
    pub total_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<usize>,
}

/// `{ data: [...], pagination: { totalCount, ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: PageInfo,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, total_count: usize) -> Self {
        Self {
            data,
            pagination: PageInfo {
                total_count,
                ..PageInfo::default()
            },
        }
    }

    pub fn total_count(&self) -> usize {
        self.pagination.total_count
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl ListResponse<Value> {
    /// Deserialize every row into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<ListResponse<T>, serde_json::Error> {
        let data = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ListResponse {
            data,
            pagination: self.pagination,
        })
    }
}
