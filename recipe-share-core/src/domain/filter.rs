use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::ids::{AllergyId, CategoryId, DifficultyId};

/// User-selected search and filter criteria for the recipe listing.
///
/// Numeric bounds are held as the raw text the user typed; they are only
/// interpreted when a request is built (see [`parse_positive`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category_ids: BTreeSet<CategoryId>,
    pub allergy_ids: BTreeSet<AllergyId>,
    pub difficulty_ids: BTreeSet<DifficultyId>,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    pub ingredient_search: String,
    pub max_prep_time: String,
    pub min_servings: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_category_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CategoryId>,
    {
        self.category_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allergy_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AllergyId>,
    {
        self.allergy_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_difficulty_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DifficultyId>,
    {
        self.difficulty_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_vegan(mut self, is_vegan: bool) -> Self {
        self.is_vegan = is_vegan;
        self
    }

    pub fn with_vegetarian(mut self, is_vegetarian: bool) -> Self {
        self.is_vegetarian = is_vegetarian;
        self
    }

    pub fn with_ingredient_search(mut self, search: impl Into<String>) -> Self {
        self.ingredient_search = search.into();
        self
    }

    pub fn with_max_prep_time(mut self, raw: impl Into<String>) -> Self {
        self.max_prep_time = raw.into();
        self
    }

    pub fn with_min_servings(mut self, raw: impl Into<String>) -> Self {
        self.min_servings = raw.into();
        self
    }

    /// True when any field differs from its empty value. Raw text counts as
    /// active even if it would be dropped from a request.
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty()
            || !self.category_ids.is_empty()
            || !self.allergy_ids.is_empty()
            || !self.difficulty_ids.is_empty()
            || self.is_vegan
            || self.is_vegetarian
            || !self.ingredient_search.is_empty()
            || !self.max_prep_time.is_empty()
            || !self.min_servings.is_empty()
    }

    pub fn max_prep_time_value(&self) -> Option<u32> {
        parse_positive(&self.max_prep_time)
    }

    pub fn min_servings_value(&self) -> Option<u32> {
        parse_positive(&self.min_servings)
    }
}

/// Parse user-entered text as a strictly positive integer.
pub fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("30", Some(30) ; "plain number")]
    #[test_case(" 45 ", Some(45) ; "surrounding whitespace")]
    #[test_case("0", None ; "zero")]
    #[test_case("-5", None ; "negative")]
    #[test_case("abc", None ; "not a number")]
    #[test_case("12abc", None ; "trailing garbage")]
    #[test_case("", None ; "empty")]
    fn test_parse_positive(raw: &str, expected: Option<u32>) {
        assert_eq!(parse_positive(raw), expected);
    }

    #[test]
    fn test_default_has_no_active_filters() {
        assert!(!FilterCriteria::default().has_active_filters());
    }

    #[test]
    fn test_any_field_activates_filters() {
        assert!(FilterCriteria::new().with_search_term("pasta").has_active_filters());
        assert!(FilterCriteria::new().with_vegan(true).has_active_filters());
        assert!(FilterCriteria::new().with_category_ids(["c1"]).has_active_filters());
        assert!(FilterCriteria::new().with_max_prep_time("abc").has_active_filters());
    }

    #[test]
    fn test_id_sets_deduplicate() {
        let criteria = FilterCriteria::new().with_allergy_ids(["a2", "a1", "a2"]);
        let ids: Vec<&str> = criteria.allergy_ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }
}
