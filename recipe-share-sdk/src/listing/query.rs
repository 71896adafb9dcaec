//! Listing request construction

use recipe_share_core::{parse_positive, FilterCriteria};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Page size requested by the listing
pub const LISTING_PAGE_SIZE: u32 = 20;

/// Query parameters of one listing request.
///
/// Only meaningful fields are carried: trimmed text that is not empty, id
/// lists that are not empty, flags that are set, and numeric bounds that
/// parse as positive integers. `page` and `limit` are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category_ids: Option<String>,
    pub allergy_ids: Option<String>,
    pub difficulty_ids: Option<String>,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    pub ingredient_search: Option<String>,
    pub max_prep_time: Option<u32>,
    pub min_servings: Option<u32>,
    pub page: u32,
    pub limit: u32,
}

impl ListingQuery {
    pub fn from_criteria(criteria: &FilterCriteria, page: u32) -> Self {
        Self {
            search: non_empty(&criteria.search_term),
            category_ids: join_ids(&criteria.category_ids),
            allergy_ids: join_ids(&criteria.allergy_ids),
            difficulty_ids: join_ids(&criteria.difficulty_ids),
            is_vegan: criteria.is_vegan,
            is_vegetarian: criteria.is_vegetarian,
            ingredient_search: non_empty(&criteria.ingredient_search),
            max_prep_time: parse_positive(&criteria.max_prep_time),
            min_servings: parse_positive(&criteria.min_servings),
            page: page.max(1),
            limit: LISTING_PAGE_SIZE,
        }
    }

    /// Key/value pairs in a stable order, ready for a query string.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ids) = &self.category_ids {
            pairs.push(("categoryIds", ids.clone()));
        }
        if let Some(ids) = &self.allergy_ids {
            pairs.push(("allergyIds", ids.clone()));
        }
        if let Some(ids) = &self.difficulty_ids {
            pairs.push(("difficultyIds", ids.clone()));
        }
        if self.is_vegan {
            pairs.push(("isVegan", "true".to_string()));
        }
        if self.is_vegetarian {
            pairs.push(("isVegetarian", "true".to_string()));
        }
        if let Some(search) = &self.ingredient_search {
            pairs.push(("ingredientSearch", search.clone()));
        }
        if let Some(minutes) = self.max_prep_time {
            pairs.push(("maxPrepTime", minutes.to_string()));
        }
        if let Some(servings) = self.min_servings {
            pairs.push(("minServings", servings.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    /// URL-encoded form, e.g. `search=pasta&page=1&limit=20`
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn join_ids<T: Display>(ids: &BTreeSet<T>) -> Option<String> {
    (!ids.is_empty()).then(|| {
        ids.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    })
}
