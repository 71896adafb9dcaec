//! Recipes resource client
//!
//! Listing, detail, creation and deletion of recipes.

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use crate::listing::query::ListingQuery;
use recipe_share_core::{
    AllergyId, CategoryId, DifficultyId, Ingredient, Instruction, PaginationState, RecipeDetail,
    RecipeId, RecipeSummary,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Client for recipe operations
#[derive(Debug, Clone)]
pub struct RecipesClient {
    client: Arc<HttpClient>,
}

impl RecipesClient {
    /// Create a new recipes client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Fetch one page of the filtered listing
    pub async fn list(&self, query: &ListingQuery) -> SdkResult<ListingResponse> {
        self.client
            .get_with_query("/api/recipes", query.pairs().as_slice())
            .await
    }

    /// Get a recipe by ID. `Ok(None)` when it does not exist.
    pub async fn get(&self, id: &RecipeId) -> SdkResult<Option<RecipeDetail>> {
        self.client
            .get_optional(&format!("/api/recipes/{}", id))
            .await
    }

    /// Get a recipe by ID, treating absence as an error
    pub async fn require(&self, id: &RecipeId) -> SdkResult<RecipeDetail> {
        self.get(id)
            .await?
            .ok_or_else(|| SdkError::recipe_not_found(id.as_str()))
    }

    /// Create a new recipe. The image must already be uploaded.
    pub async fn create(&self, request: CreateRecipeRequest) -> SdkResult<CreatedRecipe> {
        request.validate()?;
        self.client.post("/api/recipes", request).await
    }

    /// Delete a recipe. Only its author may do this.
    pub async fn delete(&self, id: &RecipeId) -> SdkResult<()> {
        self.client.delete(&format!("/api/recipes/{}", id)).await
    }
}

/// One page of the listing.
///
/// The endpoint answers either `{ "recipes": [...], "pagination": {...} }`
/// or a bare array; both decode into this type.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "ListingPayload")]
pub struct ListingResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: Option<PaginationState>,
}

impl ListingResponse {
    pub fn new(recipes: Vec<RecipeSummary>, pagination: Option<PaginationState>) -> Self {
        Self {
            recipes,
            pagination,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingPayload {
    Paged {
        #[serde(default)]
        recipes: Vec<RecipeSummary>,
        #[serde(default)]
        pagination: Option<PaginationState>,
    },
    Bare(Vec<RecipeSummary>),
}

impl From<ListingPayload> for ListingResponse {
    fn from(payload: ListingPayload) -> Self {
        match payload {
            ListingPayload::Paged {
                recipes,
                pagination,
            } => Self::new(recipes, pagination),
            ListingPayload::Bare(recipes) => Self::new(recipes, None),
        }
    }
}

/// Request to create a new recipe
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "image_path", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[validate(range(min = 1))]
    pub preparation_time: u32,
    #[validate(range(min = 1))]
    pub servings: u32,
    pub is_vegan: bool,
    pub is_vegetarian: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_id: Option<DifficultyId>,
    pub category_ids: Vec<CategoryId>,
    pub allergy_ids: Vec<AllergyId>,
    #[validate(length(min = 1))]
    pub ingredients: Vec<Ingredient>,
    #[validate(length(min = 1))]
    pub instructions: Vec<Instruction>,
}

impl CreateRecipeRequest {
    /// Create a new recipe request
    pub fn new(title: impl Into<String>, preparation_time: u32, servings: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            image_path: None,
            preparation_time,
            servings,
            is_vegan: false,
            is_vegetarian: false,
            difficulty_id: None,
            category_ids: Vec::new(),
            allergy_ids: Vec::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_path(mut self, image_path: Option<String>) -> Self {
        self.image_path = image_path;
        self
    }

    /// Vegan recipes are vegetarian too
    pub fn with_diet(mut self, is_vegan: bool, is_vegetarian: bool) -> Self {
        self.is_vegan = is_vegan;
        self.is_vegetarian = is_vegetarian || is_vegan;
        self
    }

    pub fn with_difficulty(mut self, id: impl Into<DifficultyId>) -> Self {
        self.difficulty_id = Some(id.into());
        self
    }

    pub fn with_categories(mut self, ids: Vec<CategoryId>) -> Self {
        self.category_ids = ids;
        self
    }

    pub fn with_allergies(mut self, ids: Vec<AllergyId>) -> Self {
        self.allergy_ids = ids;
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Steps are renumbered from 1 in the given order
    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = steps
            .into_iter()
            .enumerate()
            .map(|(i, content)| Instruction {
                step_number: i as u32 + 1,
                content: content.into(),
            })
            .collect();
        self
    }
}

/// Response of a successful create
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedRecipe {
    pub id: RecipeId,
}
