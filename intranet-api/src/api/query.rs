//! List query parameters.

use std::collections::BTreeMap;

/// Query for a paginated list endpoint.
///
/// Serialized as `page`, `limit`, `search`, one parameter per filter
/// (e.g. `estado`) and `sort=<field>:<asc|desc>`.
///
/// # Example
///
/// ```
/// use intranet_api::api::ListQuery;
///
/// let query = ListQuery::new(2, 10)
///     .search("informe")
///     .filter("estado", "true")
///     .sort_desc("nombre");
///
/// assert_eq!(query.to_query_string(), "page=2&limit=10&search=informe&estado=true&sort=nombre%3Adesc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// One-based page number.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
    /// Field and direction, either `"asc"` or `"desc"`.
    pub sort: Option<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl ListQuery {
    /// `page` is one-based; zero is treated as 1.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
            filters: BTreeMap::new(),
            sort: None,
        }
    }

    /// Sets the search text. Blank text clears it.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Adds a filter parameter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Sorts by `field`. Any direction other than `desc` (case-insensitive)
    /// sorts ascending.
    pub fn sort(mut self, field: impl Into<String>, direction: &str) -> Self {
        let direction = if direction.trim().eq_ignore_ascii_case("desc") {
            "desc"
        } else {
            "asc"
        };
        self.sort = Some((field.into(), direction.to_string()));
        self
    }

    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort(field, "asc")
    }

    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort(field, "desc")
    }

    /// Query parameters in wire order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((key.clone(), value.clone()));
        }
        if let Some((field, direction)) = &self.sort {
            pairs.push(("sort".to_string(), format!("{}:{}", field, direction)));
        }
        pairs
    }

    /// URL-encoded query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_query() {
        assert_eq!(ListQuery::new(1, 10).to_query_string(), "page=1&limit=10");
    }

    #[test]
    fn test_sort_format() {
        let pairs = ListQuery::new(1, 20).sort_asc("fecha_inicio").to_pairs();
        assert_eq!(
            pairs.last(),
            Some(&("sort".to_string(), "fecha_inicio:asc".to_string()))
        );
    }

    #[test]
    fn test_sort_direction_normalized() {
        let query = ListQuery::new(1, 10).sort("nombre", "DESC");
        assert_eq!(query.sort, Some(("nombre".to_string(), "desc".to_string())));

        let query = ListQuery::new(1, 10).sort("nombre", "sideways");
        assert_eq!(query.sort, Some(("nombre".to_string(), "asc".to_string())));
    }

    #[test]
    fn test_blank_search_omitted() {
        let query = ListQuery::new(1, 10).search("  ");
        assert_eq!(query.search, None);
        assert_eq!(query.to_pairs().len(), 2);
    }

    #[test]
    fn test_search_is_encoded() {
        let query = ListQuery::new(3, 10).search("plan anual");
        assert_eq!(query.to_query_string(), "page=3&limit=10&search=plan+anual");
    }

    #[test]
    fn test_zero_page_clamped() {
        assert_eq!(ListQuery::new(0, 0).to_pairs()[0].1, "1");
    }
}
