use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{RecipeId, UserId};
use crate::domain::review::{average_rating, format_rating, review_count_label, Review};
use crate::domain::session::UserSummary;
use crate::domain::taxonomy::{AllergyLink, CategoryLink, Difficulty};

/// A recipe as it appears in the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "image_path", alias = "imagePath", default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub preparation_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub categories: Vec<CategoryLink>,
    #[serde(default)]
    pub allergies: Vec<AllergyLink>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Ingredient {
    /// `"200 g brašno"`, or just the name when no amount is given.
    pub fn display(&self) -> String {
        let amount: Vec<&str> = [self.quantity.as_deref(), self.unit.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if amount.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", amount.join(" "), self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub step_number: u32,
    pub content: String,
}

/// Full recipe as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "image_path", alias = "imagePath", default)]
    pub image_path: Option<String>,
    pub preparation_time: u32,
    pub servings: u32,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_vegetarian: bool,
    pub user_id: UserId,
    pub user: UserSummary,
    #[serde(default)]
    pub categories: Vec<CategoryLink>,
    #[serde(default)]
    pub allergies: Vec<AllergyLink>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecipeDetail {
    /// Recomputed from the current review set on every call.
    pub fn average_rating(&self) -> f64 {
        average_rating(&self.reviews)
    }

    /// `"4.0 (3 recenzije)"`; `None` when there is nothing to show.
    pub fn rating_summary(&self) -> Option<String> {
        let average = self.average_rating();
        (average > 0.0).then(|| {
            format!(
                "{} ({})",
                format_rating(average),
                review_count_label(self.reviews.len())
            )
        })
    }

    pub fn badges(&self) -> Vec<RecipeBadge> {
        recipe_badges(
            &self.categories,
            self.difficulty.as_ref(),
            self.is_vegan,
            self.is_vegetarian,
        )
    }

    /// Instructions in step order regardless of payload order.
    pub fn ordered_instructions(&self) -> Vec<&Instruction> {
        let mut steps: Vec<&Instruction> = self.instructions.iter().collect();
        steps.sort_by_key(|step| step.step_number);
        steps
    }
}

impl RecipeSummary {
    pub fn badges(&self) -> Vec<RecipeBadge> {
        recipe_badges(
            &self.categories,
            self.difficulty.as_ref(),
            self.is_vegan,
            self.is_vegetarian,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeBadge {
    Category(String),
    Difficulty(String),
    Vegan,
    Vegetarian,
}

impl RecipeBadge {
    pub fn label(&self) -> &str {
        match self {
            RecipeBadge::Category(name) | RecipeBadge::Difficulty(name) => name,
            RecipeBadge::Vegan => "Veganski",
            RecipeBadge::Vegetarian => "Vegetarijanski",
        }
    }
}

// Vegan implies vegetarian, so only the stronger badge is shown.
fn recipe_badges(
    categories: &[CategoryLink],
    difficulty: Option<&Difficulty>,
    is_vegan: bool,
    is_vegetarian: bool,
) -> Vec<RecipeBadge> {
    let mut badges: Vec<RecipeBadge> = categories
        .iter()
        .map(|link| RecipeBadge::Category(link.category.name.clone()))
        .collect();
    if let Some(difficulty) = difficulty {
        badges.push(RecipeBadge::Difficulty(difficulty.name.clone()));
    }
    if is_vegan {
        badges.push(RecipeBadge::Vegan);
    } else if is_vegetarian {
        badges.push(RecipeBadge::Vegetarian);
    }
    badges
}
