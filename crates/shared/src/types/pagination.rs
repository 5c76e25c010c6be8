//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
///
/// The rounds service counts pages from zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (0-indexed).
    #[serde(default)]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
        }
    }
}

impl PageRequest {
    /// Creates a request for the given page and size.
    #[must_use]
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Query parameters for the request URL.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("size", self.size.to_string())]
    }

    /// Returns the request for the following page.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
        }
    }
}

/// Page envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// The items in the current page.
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    /// Current page number (0-indexed).
    #[serde(default, alias = "number")]
    pub page: u32,
    /// Items per page.
    #[serde(default)]
    pub size: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total_elements: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Whether another page follows this one.
    #[serde(default)]
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 0);
        assert_eq!(req.size, 20);
        assert_eq!(req.next().page, 1);
    }

    #[test]
    fn test_page_request_query_pairs() {
        let pairs = PageRequest::new(2, 10).query_pairs();
        assert_eq!(pairs[0], ("page", "2".to_string()));
        assert_eq!(pairs[1], ("size", "10".to_string()));
    }

    #[test]
    fn test_page_response_reads_spring_page_number() {
        let json = r#"{"content":[5],"number":2,"size":2,"totalElements":5,"totalPages":3,"last":true}"#;
        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_response_missing_fields_default() {
        let page: PageResponse<u32> = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_response_deserialises_service_shape() {
        let json = r#"{"content":[1,2,3],"page":0,"size":3,"totalElements":7,"totalPages":3,"first":true,"last":false,"hasNext":true,"hasPrevious":false}"#;
        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(page.total_elements, 7);
        assert!(page.has_next);
    }
}
