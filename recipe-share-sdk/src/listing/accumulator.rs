//! Accumulated listing results

use crate::resources::recipes::ListingResponse;
use recipe_share_core::{PaginationState, RecipeSummary};

/// How a response is merged into what is already shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Fresh query: the response becomes the whole list
    Replace,
    /// Load-more: the response is added after the current items
    Append,
}

/// Recipes shown so far, in server order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultAccumulator {
    recipes: Vec<RecipeSummary>,
    pagination: Option<PaginationState>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recipes(&self) -> &[RecipeSummary] {
        &self.recipes
    }

    pub fn pagination(&self) -> Option<&PaginationState> {
        self.pagination.as_ref()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.pagination.map(|p| p.has_more).unwrap_or(false)
    }

    pub fn merge(&mut self, mode: MergeMode, response: ListingResponse) {
        match mode {
            MergeMode::Replace => {
                self.recipes = response.recipes;
                self.pagination = response.pagination;
            }
            MergeMode::Append => {
                self.recipes.extend(response.recipes);
                if response.pagination.is_some() {
                    self.pagination = response.pagination;
                }
            }
        }
    }

    /// Forget paging state without touching the shown recipes
    pub fn reset_pagination(&mut self) {
        self.pagination = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> RecipeSummary {
        serde_json::from_value(serde_json::json!({ "id": id, "title": id })).unwrap()
    }

    fn page(ids: &[&str], pagination: Option<PaginationState>) -> ListingResponse {
        ListingResponse::new(ids.iter().map(|id| summary(id)).collect(), pagination)
    }

    #[test]
    fn test_replace_then_append() {
        let mut acc = ResultAccumulator::new();
        acc.merge(
            MergeMode::Replace,
            page(&["a", "b"], Some(PaginationState::new(1, 2, 4, true))),
        );
        acc.merge(
            MergeMode::Append,
            page(&["c", "d"], Some(PaginationState::new(2, 2, 4, false))),
        );

        let ids: Vec<&str> = acc.recipes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(acc.pagination().map(|p| p.current_page), Some(2));
        assert!(!acc.has_more());
    }

    #[test]
    fn test_append_without_pagination_keeps_previous() {
        let mut acc = ResultAccumulator::new();
        let first = PaginationState::new(1, 3, 60, true);
        acc.merge(MergeMode::Replace, page(&["a"], Some(first)));
        acc.merge(MergeMode::Append, page(&["b"], None));

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.pagination(), Some(&first));
    }

    #[test]
    fn test_replace_with_bare_list_drops_pagination() {
        let mut acc = ResultAccumulator::new();
        acc.merge(
            MergeMode::Replace,
            page(&["a"], Some(PaginationState::new(1, 3, 60, true))),
        );
        acc.merge(MergeMode::Replace, page(&["x", "y", "z"], None));

        assert_eq!(acc.len(), 3);
        assert!(acc.pagination().is_none());
    }
}
