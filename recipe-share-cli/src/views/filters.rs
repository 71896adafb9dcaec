//! Filter panel

use recipe_share_core::{FilterCriteria, SelectableItem};
use recipe_share_sdk::listing::{FilterOptions, OptionList};
use std::collections::BTreeSet;
use std::fmt::Display;

fn selected_names<T: Display>(list: &OptionList, selected: &BTreeSet<T>) -> String {
    if list.loading {
        return "loading...".to_string();
    }
    let selected: BTreeSet<String> = selected.iter().map(ToString::to_string).collect();
    let names: Vec<&str> = list
        .items
        .iter()
        .filter(|item| selected.contains(&item.id))
        .map(|item| item.name.as_str())
        .collect();
    if names.is_empty() {
        "any".to_string()
    } else {
        names.join(", ")
    }
}

fn text_or_any(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "any".to_string()
    } else {
        trimmed.to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// One line per filter, naming the selected option labels
pub fn render_filters(criteria: &FilterCriteria, options: &FilterOptions) -> Vec<String> {
    vec![
        format!("Search: {}", text_or_any(&criteria.search_term)),
        format!(
            "Categories: {}",
            selected_names(&options.categories, &criteria.category_ids)
        ),
        format!(
            "Without allergens: {}",
            selected_names(&options.allergies, &criteria.allergy_ids)
        ),
        format!(
            "Difficulty: {}",
            selected_names(&options.difficulties, &criteria.difficulty_ids)
        ),
        format!(
            "Vegan: {}  Vegetarian: {}",
            yes_no(criteria.is_vegan),
            yes_no(criteria.is_vegetarian)
        ),
        format!("Ingredient: {}", text_or_any(&criteria.ingredient_search)),
        format!(
            "Max prep time: {}",
            criteria
                .max_prep_time_value()
                .map(|m| format!("{} min", m))
                .unwrap_or_else(|| "any".to_string())
        ),
        format!(
            "Min servings: {}",
            criteria
                .min_servings_value()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "any".to_string())
        ),
    ]
}

/// Labels for a multi-select prompt plus which of them start checked
pub fn choices<T: Display>(
    items: &[SelectableItem],
    selected: &BTreeSet<T>,
) -> (Vec<String>, Vec<bool>) {
    let selected: BTreeSet<String> = selected.iter().map(ToString::to_string).collect();
    items
        .iter()
        .map(|item| (item.name.clone(), selected.contains(&item.id)))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: &str, name: &str) -> SelectableItem {
        SelectableItem {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn loaded() -> FilterOptions {
        FilterOptions {
            categories: OptionList::ready(vec![item("c1", "Juhe"), item("c2", "Deserti")]),
            allergies: OptionList::ready(vec![item("a1", "Gluten")]),
            difficulties: OptionList::pending(),
        }
    }

    #[test]
    fn test_render_filters() {
        let criteria = FilterCriteria::new()
            .with_search_term("  sarma ")
            .with_category_ids(["c2"])
            .with_vegan(true)
            .with_max_prep_time("45")
            .with_min_servings("-2");

        let lines = render_filters(&criteria, &loaded());

        assert_eq!(
            lines,
            vec![
                "Search: sarma",
                "Categories: Deserti",
                "Without allergens: any",
                "Difficulty: loading...",
                "Vegan: yes  Vegetarian: no",
                "Ingredient: any",
                "Max prep time: 45 min",
                "Min servings: any",
            ]
        );
    }

    #[test]
    fn test_choices_mark_selection() {
        let selected: BTreeSet<String> = ["c1".to_string()].into_iter().collect();
        let (labels, checked) = choices(&loaded().categories.items, &selected);
        assert_eq!(labels, vec!["Juhe", "Deserti"]);
        assert_eq!(checked, vec![true, false]);
    }
}
