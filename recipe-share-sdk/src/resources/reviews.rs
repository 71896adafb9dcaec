//! Reviews resource client

use crate::client::HttpClient;
use crate::error::SdkResult;
use recipe_share_core::{RecipeId, Review, ReviewDraft, ReviewId};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

/// Client for posting and editing reviews
#[derive(Debug, Clone)]
pub struct ReviewsClient {
    client: Arc<HttpClient>,
}

impl ReviewsClient {
    /// Create a new reviews client
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Review a recipe. Drafts with a rating outside 1..=5 are rejected
    /// before any request is made.
    pub async fn create(&self, recipe_id: &RecipeId, draft: ReviewDraft) -> SdkResult<Review> {
        draft.validate()?;
        debug!(recipe_id = %recipe_id, rating = draft.rating, "Posting review");
        self.client
            .post(&format!("/api/recipes/{}/reviews", recipe_id), draft)
            .await
    }

    /// Edit one of the viewer's own reviews
    pub async fn update(&self, review_id: &ReviewId, draft: ReviewDraft) -> SdkResult<Review> {
        draft.validate()?;
        debug!(review_id = %review_id, rating = draft.rating, "Updating review");
        self.client
            .put(&format!("/api/reviews/{}", review_id), draft)
            .await
    }
}
