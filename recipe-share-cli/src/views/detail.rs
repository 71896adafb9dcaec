//! Recipe detail

use colored::Colorize;
use comfy_table::Cell;
use recipe_share_core::RecipeDetail;
use recipe_share_sdk::{AuthoringAction, RecipePage};
use serde::Serialize;

use crate::output::{print_field, print_lines, print_optional_field, print_section, TableDisplay};
use crate::views::allergies::render_allergies;
use crate::views::reviews::render_reviews;
use crate::views::{badge_line, rating_block};

/// A recipe as the viewer sees it
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetailView {
    pub recipe: RecipeDetail,
    pub average_rating: f64,
    pub is_author: bool,
    pub can_review: bool,
    pub actions: Vec<&'static str>,
    #[serde(skip)]
    rating: Option<String>,
    #[serde(skip)]
    badges: Option<String>,
    #[serde(skip)]
    allergies: Vec<String>,
    #[serde(skip)]
    reviews: Vec<String>,
}

fn action_name(action: &AuthoringAction) -> &'static str {
    match action {
        AuthoringAction::Edit => "edit",
        AuthoringAction::Delete => "delete",
    }
}

impl From<&RecipePage> for RecipeDetailView {
    fn from(page: &RecipePage) -> Self {
        let recipe = page.recipe().clone();
        Self {
            average_rating: page.average_rating(),
            is_author: page.is_author(),
            can_review: page.can_review(),
            actions: page.authoring_actions().iter().map(action_name).collect(),
            rating: rating_block(page.average_rating(), recipe.reviews.len()),
            badges: badge_line(&recipe.badges()),
            allergies: render_allergies(&recipe.allergies),
            reviews: render_reviews(&recipe.reviews, page.viewer()),
            recipe,
        }
    }
}

impl RecipeDetailView {
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.recipe
            .ingredients
            .iter()
            .map(|ingredient| format!("• {}", ingredient.display()))
            .collect()
    }

    pub fn step_lines(&self) -> Vec<String> {
        self.recipe
            .ordered_instructions()
            .iter()
            .map(|step| format!("{}. {}", step.step_number, step.content))
            .collect()
    }
}

impl TableDisplay for RecipeDetailView {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.recipe.id),
            Cell::new(&self.recipe.title),
            Cell::new(self.rating.as_deref().unwrap_or("-")),
        ]
    }

    fn display_single(&self) {
        println!("{}", self.recipe.title.bold());
        if let Some(rating) = &self.rating {
            println!("{}", rating.yellow());
        }
        if let Some(badges) = &self.badges {
            println!("{}", badges.dimmed());
        }
        if let Some(description) = &self.recipe.description {
            println!("\n{}", description);
        }

        print_section("Details");
        print_field(
            "Preparation",
            &format!("{} min", self.recipe.preparation_time),
        );
        print_field("Servings", &self.recipe.servings.to_string());
        print_optional_field("Author", self.recipe.user.name.as_deref());
        print_optional_field("Image", self.recipe.image_path.as_deref());

        if !self.recipe.ingredients.is_empty() {
            print_section("Ingredients");
            print_lines(&self.ingredient_lines());
        }
        if !self.recipe.instructions.is_empty() {
            print_section("Instructions");
            print_lines(&self.step_lines());
        }
        if !self.allergies.is_empty() {
            print_section("Allergens");
            print_lines(&self.allergies);
        }
        if !self.reviews.is_empty() {
            print_section("Reviews");
            print_lines(&self.reviews);
        }

        if !self.actions.is_empty() {
            println!(
                "\n{} {}",
                "You wrote this recipe:".cyan(),
                self.actions.join(", ")
            );
        } else if self.can_review {
            println!(
                "\n{} recipe-share recipes review {} --rating <1-5>",
                "Leave a review:".cyan(),
                self.recipe.id
            );
        }
    }

    fn display_compact(&self) {
        println!(
            "{}\t{}\t{}",
            self.recipe.id,
            self.recipe.title,
            self.rating.as_deref().unwrap_or("-")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recipe_share_core::{Session, SessionContext, UserSummary};
    use serde_json::json;

    fn detail() -> RecipeDetail {
        serde_json::from_value(json!({
            "id": "r1",
            "title": "Fritule",
            "preparationTime": 40,
            "servings": 8,
            "isVegetarian": true,
            "userId": "chef",
            "user": { "id": "chef", "name": "Mara" },
            "difficulty": { "id": "d1", "name": "Lagano", "level": 1 },
            "ingredients": [
                { "name": "brašno", "quantity": "500", "unit": "g" },
                { "name": "sol" }
            ],
            "instructions": [
                { "stepNumber": 2, "content": "Pržiti" },
                { "stepNumber": 1, "content": "Umijesiti tijesto" }
            ],
            "reviews": [
                { "id": "a", "rating": 5, "userId": "u1", "user": { "id": "u1", "name": "Ana" },
                  "createdAt": "2024-06-01T08:00:00Z", "updatedAt": "2024-06-01T08:00:00Z" },
                { "id": "b", "rating": 3, "userId": "u2", "user": { "id": "u2", "name": "Ivo" },
                  "createdAt": "2024-06-02T08:00:00Z", "updatedAt": "2024-06-02T08:00:00Z" },
                { "id": "c", "rating": 4, "userId": "u3", "user": { "id": "u3" },
                  "createdAt": "2024-06-03T08:00:00Z", "updatedAt": "2024-06-03T08:00:00Z" }
            ]
        }))
        .unwrap()
    }

    fn viewer(id: &str) -> SessionContext {
        SessionContext::authenticated(Session {
            user: UserSummary {
                id: id.into(),
                name: None,
                image: None,
            },
        })
    }

    #[test]
    fn test_visitor_view() {
        let view = RecipeDetailView::from(&RecipePage::new(detail(), viewer("u9")));

        assert_eq!(view.rating.as_deref(), Some("★ 4.0 (3 recenzije)"));
        assert_eq!(view.badges.as_deref(), Some("[Lagano] [Vegetarijanski]"));
        assert!(view.actions.is_empty());
        assert!(view.can_review);
        assert!(view.allergies.is_empty());
        assert_eq!(view.ingredient_lines(), vec!["• 500 g brašno", "• sol"]);
        assert_eq!(view.step_lines(), vec!["1. Umijesiti tijesto", "2. Pržiti"]);
    }

    #[test]
    fn test_author_view() {
        let view = RecipeDetailView::from(&RecipePage::new(detail(), viewer("chef")));
        assert_eq!(view.actions, vec!["edit", "delete"]);
        assert!(!view.can_review);
    }

    #[test]
    fn test_no_reviews_no_rating_block() {
        let mut recipe = detail();
        recipe.reviews.clear();
        let view = RecipeDetailView::from(&RecipePage::new(recipe, SessionContext::anonymous()));

        assert_eq!(view.rating, None);
        assert!(view.reviews.is_empty());
        assert!(!view.can_review);
    }
}
