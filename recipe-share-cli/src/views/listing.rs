//! Recipe list

use comfy_table::Cell;
use recipe_share_core::{PaginationState, RecipeSummary};
use recipe_share_sdk::listing::ListingPhase;
use recipe_share_sdk::ListingSnapshot;
use serde::Serialize;

use crate::output::TableDisplay;
use crate::views::{badge_line, rating_block};

pub const EMPTY_LISTING: &str = "No recipes found";
pub const CLEAR_FILTERS_HINT: &str = "Try clearing the filters to see all recipes.";
pub const CREATE_RECIPE_HINT: &str = "Share your own: recipe-share recipes create --help";

pub const LISTING_HEADERS: &[&str] = &["ID", "Title", "Time", "Servings", "Rating", "Tags"];

/// One row of the recipe list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeRow {
    pub id: String,
    pub title: String,
    pub preparation_time: Option<u32>,
    pub servings: Option<u32>,
    pub rating: Option<String>,
    pub badges: Option<String>,
    pub author: Option<String>,
}

impl From<&RecipeSummary> for RecipeRow {
    fn from(recipe: &RecipeSummary) -> Self {
        let rating = recipe.average_rating.and_then(|average| {
            rating_block(average, recipe.review_count.unwrap_or(0) as usize)
        });
        Self {
            id: recipe.id.to_string(),
            title: recipe.title.clone(),
            preparation_time: recipe.preparation_time,
            servings: recipe.servings,
            rating,
            badges: badge_line(&recipe.badges()),
            author: recipe
                .user
                .as_ref()
                .map(|user| user.display_name().to_string())
                .filter(|name| !name.is_empty()),
        }
    }
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl TableDisplay for RecipeRow {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            Cell::new(&self.title),
            Cell::new(or_dash(self.preparation_time.map(|m| format!("{} min", m)))),
            Cell::new(or_dash(self.servings)),
            Cell::new(or_dash(self.rating.as_deref())),
            Cell::new(or_dash(self.badges.as_deref())),
        ]
    }

    fn display_single(&self) {
        println!("{}  {}", self.id, self.title);
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}",
            self.id,
            self.title,
            or_dash(self.rating.as_deref())
        );
    }
}

pub fn rows(recipes: &[RecipeSummary]) -> Vec<RecipeRow> {
    recipes.iter().map(RecipeRow::from).collect()
}

/// What replaces the table when nothing matched
pub fn empty_message(has_active_filters: bool) -> Vec<String> {
    let mut lines = vec![EMPTY_LISTING.to_string()];
    if has_active_filters {
        lines.push(CLEAR_FILTERS_HINT.to_string());
    }
    lines
}

/// Progress line for the phase the listing is in
pub fn phase_line(phase: ListingPhase) -> Option<&'static str> {
    match phase {
        ListingPhase::Loading => Some("Loading recipes..."),
        ListingPhase::Filtering => Some("Updating results..."),
        ListingPhase::LoadingMore => Some("Loading more recipes..."),
        ListingPhase::Idle | ListingPhase::Error => None,
    }
}

/// `"Showing 20 of 45 recipes (page 1 of 3)"`
pub fn summary_line(shown: usize, pagination: Option<&PaginationState>) -> String {
    match pagination {
        Some(p) => format!(
            "Showing {} of {} recipes (page {} of {})",
            shown,
            p.total_count,
            p.current_page,
            p.total_pages.max(p.current_page)
        ),
        None => format!("Showing {} recipes", shown),
    }
}

pub fn snapshot_summary(snapshot: &ListingSnapshot) -> String {
    summary_line(snapshot.recipes.len(), snapshot.pagination.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn recipe(value: serde_json::Value) -> RecipeSummary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_row_from_summary() {
        let row = RecipeRow::from(&recipe(json!({
            "id": "r1",
            "title": "Grah",
            "preparationTime": 120,
            "servings": 6,
            "isVegan": true,
            "isVegetarian": true,
            "categories": [{ "category": { "id": "c1", "name": "Variva" } }],
            "user": { "id": "u1", "name": "Ivo" },
            "averageRating": 4.0,
            "reviewCount": 3
        })));

        assert_eq!(row.rating.as_deref(), Some("★ 4.0 (3 recenzije)"));
        assert_eq!(row.badges.as_deref(), Some("[Variva] [Veganski]"));
        assert_eq!(row.author.as_deref(), Some("Ivo"));
    }

    #[test]
    fn test_unrated_recipe_has_no_rating() {
        let row = RecipeRow::from(&recipe(json!({ "id": "r2", "title": "Kruh", "averageRating": 0.0 })));
        assert_eq!(row.rating, None);
        assert_eq!(row.badges, None);
        assert_eq!(row.author, None);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(empty_message(false), vec![EMPTY_LISTING.to_string()]);
        assert_eq!(
            empty_message(true),
            vec![EMPTY_LISTING.to_string(), CLEAR_FILTERS_HINT.to_string()]
        );
    }

    #[test]
    fn test_summary_line() {
        let pagination = PaginationState::new(1, 3, 45, true);
        assert_eq!(
            summary_line(20, Some(&pagination)),
            "Showing 20 of 45 recipes (page 1 of 3)"
        );
        assert_eq!(summary_line(4, None), "Showing 4 recipes");
    }

    #[test]
    fn test_phase_line() {
        assert_eq!(phase_line(ListingPhase::Idle), None);
        assert!(phase_line(ListingPhase::LoadingMore).is_some());
    }
}
