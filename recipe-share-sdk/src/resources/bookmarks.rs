//! Bookmarks resource client

use crate::client::HttpClient;
use crate::error::SdkResult;
use recipe_share_core::RecipeId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client for the viewer's recipe bookmarks
#[derive(Debug, Clone)]
pub struct BookmarksClient {
    client: Arc<HttpClient>,
}

impl BookmarksClient {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Whether the viewer has bookmarked the recipe
    pub async fn status(&self, recipe_id: &RecipeId) -> SdkResult<BookmarkStatus> {
        self.client
            .get(&format!("/api/recipes/{}/bookmark", recipe_id))
            .await
    }

    /// Flip the bookmark and return the new state
    pub async fn toggle(&self, recipe_id: &RecipeId) -> SdkResult<BookmarkStatus> {
        self.client
            .post_empty(&format!("/api/recipes/{}/bookmark", recipe_id))
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatus {
    pub is_bookmarked: bool,
}
