//! Filter state store
//!
//! Holds the current [`FilterCriteria`] and publishes every change on a
//! `watch` channel. Each setter replaces exactly one field and bumps the
//! revision; nothing is validated here.

use recipe_share_core::{AllergyId, CategoryId, DifficultyId, FilterCriteria};
use std::sync::Arc;
use tokio::sync::watch;

/// Criteria together with the revision that produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    pub criteria: FilterCriteria,
    pub revision: u64,
}

/// Shared handle to the listing's filter state
#[derive(Debug, Clone)]
pub struct FilterStore {
    tx: Arc<watch::Sender<FilterSnapshot>>,
}

impl FilterStore {
    pub fn new(criteria: FilterCriteria) -> Self {
        let (tx, _rx) = watch::channel(FilterSnapshot {
            criteria,
            revision: 0,
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> FilterSnapshot {
        self.tx.borrow().clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.tx.borrow().criteria.clone()
    }

    pub fn revision(&self) -> u64 {
        self.tx.borrow().revision
    }

    pub fn has_active_filters(&self) -> bool {
        self.tx.borrow().criteria.has_active_filters()
    }

    pub fn set_search_term(&self, term: impl Into<String>) -> u64 {
        let term = term.into();
        self.update(|c| c.search_term = term)
    }

    pub fn set_category_ids(&self, ids: impl IntoIterator<Item = CategoryId>) -> u64 {
        let ids = ids.into_iter().collect();
        self.update(|c| c.category_ids = ids)
    }

    pub fn set_allergy_ids(&self, ids: impl IntoIterator<Item = AllergyId>) -> u64 {
        let ids = ids.into_iter().collect();
        self.update(|c| c.allergy_ids = ids)
    }

    pub fn set_difficulty_ids(&self, ids: impl IntoIterator<Item = DifficultyId>) -> u64 {
        let ids = ids.into_iter().collect();
        self.update(|c| c.difficulty_ids = ids)
    }

    /// Add the id if absent, remove it otherwise
    pub fn toggle_category(&self, id: CategoryId) -> u64 {
        self.update(|c| {
            if !c.category_ids.remove(&id) {
                c.category_ids.insert(id);
            }
        })
    }

    pub fn toggle_allergy(&self, id: AllergyId) -> u64 {
        self.update(|c| {
            if !c.allergy_ids.remove(&id) {
                c.allergy_ids.insert(id);
            }
        })
    }

    pub fn toggle_difficulty(&self, id: DifficultyId) -> u64 {
        self.update(|c| {
            if !c.difficulty_ids.remove(&id) {
                c.difficulty_ids.insert(id);
            }
        })
    }

    pub fn set_vegan(&self, is_vegan: bool) -> u64 {
        self.update(|c| c.is_vegan = is_vegan)
    }

    pub fn set_vegetarian(&self, is_vegetarian: bool) -> u64 {
        self.update(|c| c.is_vegetarian = is_vegetarian)
    }

    pub fn set_ingredient_search(&self, search: impl Into<String>) -> u64 {
        let search = search.into();
        self.update(|c| c.ingredient_search = search)
    }

    pub fn set_max_prep_time(&self, raw: impl Into<String>) -> u64 {
        let raw = raw.into();
        self.update(|c| c.max_prep_time = raw)
    }

    pub fn set_min_servings(&self, raw: impl Into<String>) -> u64 {
        let raw = raw.into();
        self.update(|c| c.min_servings = raw)
    }

    /// Overwrite every field in a single notification
    pub fn replace(&self, criteria: FilterCriteria) -> u64 {
        self.update(|c| *c = criteria)
    }

    /// Reset to the empty criteria
    pub fn clear(&self) -> u64 {
        self.replace(FilterCriteria::default())
    }

    fn update(&self, apply: impl FnOnce(&mut FilterCriteria)) -> u64 {
        let mut revision = 0;
        self.tx.send_modify(|snapshot| {
            apply(&mut snapshot.criteria);
            snapshot.revision += 1;
            revision = snapshot.revision;
        });
        revision
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}
