//! One-shot import of filter criteria from a page address

use recipe_share_core::FilterCriteria;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Criteria imported from the address at mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSeed {
    pub criteria: FilterCriteria,
    /// The address named allergies explicitly, so the user's saved
    /// allergy profile must not override them.
    pub has_allergy_ids: bool,
}

/// Parse a raw query string (without the leading `?`).
///
/// Returns `None` when no recognised parameter carries a value. Only the
/// first occurrence of a key counts.
pub fn parse_seed(query: &str) -> Option<UrlSeed> {
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    let text = |key: &str| params.get(key).cloned().unwrap_or_default();
    let flag = |key: &str| params.get(key).map(String::as_str) == Some("true");
    let ids = |key: &str| -> Vec<String> {
        params
            .get(key)
            .map(|raw| {
                raw.split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    };

    let criteria = FilterCriteria::new()
        .with_search_term(text("search"))
        .with_category_ids(ids("categoryIds"))
        .with_allergy_ids(ids("allergyIds"))
        .with_difficulty_ids(ids("difficultyIds"))
        .with_vegan(flag("isVegan"))
        .with_vegetarian(flag("isVegetarian"))
        .with_ingredient_search(text("ingredientSearch"))
        .with_max_prep_time(text("maxPrepTime"))
        .with_min_servings(text("minServings"));

    if !criteria.has_active_filters() {
        return None;
    }

    Some(UrlSeed {
        has_allergy_ids: !criteria.allergy_ids.is_empty(),
        criteria,
    })
}

/// Import criteria from `location` and strip its query in place.
///
/// The address is left untouched when nothing was imported.
pub fn seed_from_location(location: &mut Url) -> Option<UrlSeed> {
    let seed = parse_seed(location.query()?)?;
    location.set_query(None);
    debug!(location = %location, "Seeded listing filters from address");
    Some(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_share_core::CategoryId;

    #[test]
    fn test_search_and_vegan_seed() {
        let mut location = Url::parse("https://recepti.example.com/recipes?search=pasta&isVegan=true").unwrap();
        let seed = seed_from_location(&mut location).unwrap();

        assert_eq!(seed.criteria.search_term, "pasta");
        assert!(seed.criteria.is_vegan);
        assert!(!seed.criteria.is_vegetarian);
        assert!(!seed.has_allergy_ids);
        assert_eq!(location.as_str(), "https://recepti.example.com/recipes");
    }

    #[test]
    fn test_id_lists_drop_empty_segments() {
        let seed = parse_seed("categoryIds=c1,,c2,&allergyIds=a1").unwrap();
        assert_eq!(
            seed.criteria.category_ids.into_iter().collect::<Vec<_>>(),
            vec![CategoryId::from("c1"), CategoryId::from("c2")]
        );
        assert!(seed.has_allergy_ids);
    }

    #[test]
    fn test_only_literal_true_sets_flags() {
        let seed = parse_seed("isVegan=1&isVegetarian=TRUE&search=x").unwrap();
        assert!(!seed.criteria.is_vegan);
        assert!(!seed.criteria.is_vegetarian);
    }

    #[test]
    fn test_numeric_text_is_kept_raw() {
        let seed = parse_seed("maxPrepTime=abc").unwrap();
        assert_eq!(seed.criteria.max_prep_time, "abc");
    }

    #[test]
    fn test_no_recognised_params_leaves_address() {
        let mut location =
            Url::parse("https://recepti.example.com/recipes?isVegan=false&utm=x").unwrap();
        assert!(seed_from_location(&mut location).is_none());
        assert_eq!(location.query(), Some("isVegan=false&utm=x"));

        let mut bare = Url::parse("https://recepti.example.com/recipes").unwrap();
        assert!(seed_from_location(&mut bare).is_none());
    }
}
