use serde::{Deserialize, Serialize};

/// Pagination state reported by the listing endpoint.
///
/// `has_more` is taken from the server as-is and is the only input deciding
/// whether another page may be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub has_more: bool,
}

impl PaginationState {
    pub fn new(current_page: u32, total_pages: u32, total_count: u64, has_more: bool) -> Self {
        Self {
            current_page: current_page.max(1),
            total_pages,
            total_count,
            has_more,
        }
    }

    /// The page a "load more" action would request, if any. None past the
    /// last representable page.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more
            .then(|| self.current_page.checked_add(1))
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"currentPage":2,"totalPages":5,"totalCount":93,"hasMore":true}"#;
        let state: PaginationState = serde_json::from_str(json).unwrap();
        assert_eq!(state, PaginationState::new(2, 5, 93, true));
    }

    #[test]
    fn test_next_page_follows_has_more() {
        assert_eq!(PaginationState::new(2, 5, 93, true).next_page(), Some(3));
        assert_eq!(PaginationState::new(5, 5, 93, false).next_page(), None);
    }

    #[test]
    fn test_next_page_at_u32_max() {
        let json = r#"{"currentPage":4294967295,"hasMore":true}"#;
        let state: PaginationState = serde_json::from_str(json).unwrap();
        assert_eq!(state.next_page(), None);
    }

    #[test]
    fn test_current_page_is_at_least_one() {
        assert_eq!(PaginationState::new(0, 0, 0, false).current_page, 1);
    }
}
