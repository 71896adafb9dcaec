//! Read-side seams used by the listing and detail pages
//!
//! The page logic talks to these traits instead of the HTTP client so it
//! can run against mocks.

use crate::error::SdkResult;
use crate::listing::query::ListingQuery;
use crate::resources::recipes::ListingResponse;
use crate::RecipeShareClient;
use async_trait::async_trait;
use recipe_share_core::{Allergy, Category, Difficulty, RecipeDetail, RecipeId, Session};

/// Everything the listing page reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn list_recipes(&self, query: &ListingQuery) -> SdkResult<ListingResponse>;

    async fn categories(&self) -> SdkResult<Vec<Category>>;

    async fn allergies(&self) -> SdkResult<Vec<Allergy>>;

    async fn difficulties(&self) -> SdkResult<Vec<Difficulty>>;

    async fn user_allergies(&self) -> SdkResult<Vec<Allergy>>;
}

/// Everything the detail page reads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeReader: Send + Sync {
    /// `Ok(None)` when the recipe does not exist
    async fn recipe(&self, id: &RecipeId) -> SdkResult<Option<RecipeDetail>>;

    async fn session(&self) -> SdkResult<Option<Session>>;
}

#[async_trait]
impl RecipeCatalog for RecipeShareClient {
    async fn list_recipes(&self, query: &ListingQuery) -> SdkResult<ListingResponse> {
        self.recipes().list(query).await
    }

    async fn categories(&self) -> SdkResult<Vec<Category>> {
        self.taxonomy().categories().await
    }

    async fn allergies(&self) -> SdkResult<Vec<Allergy>> {
        self.taxonomy().allergies().await
    }

    async fn difficulties(&self) -> SdkResult<Vec<Difficulty>> {
        self.taxonomy().difficulties().await
    }

    async fn user_allergies(&self) -> SdkResult<Vec<Allergy>> {
        self.taxonomy().user_allergies().await
    }
}

#[async_trait]
impl RecipeReader for RecipeShareClient {
    async fn recipe(&self, id: &RecipeId) -> SdkResult<Option<RecipeDetail>> {
        self.recipes().get(id).await
    }

    async fn session(&self) -> SdkResult<Option<Session>> {
        self.auth().current().await
    }
}
