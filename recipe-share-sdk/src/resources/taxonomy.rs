//! Filter vocabularies and the viewer's allergy profile

use crate::client::HttpClient;
use crate::error::SdkResult;
use recipe_share_core::{Allergy, Category, Difficulty};
use serde::Deserialize;
use std::sync::Arc;

/// Client for the category, allergy and difficulty vocabularies
#[derive(Debug, Clone)]
pub struct TaxonomyClient {
    client: Arc<HttpClient>,
}

impl TaxonomyClient {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn categories(&self) -> SdkResult<Vec<Category>> {
        self.client.get("/api/categories").await
    }

    pub async fn allergies(&self) -> SdkResult<Vec<Allergy>> {
        self.client.get("/api/allergies").await
    }

    pub async fn difficulties(&self) -> SdkResult<Vec<Difficulty>> {
        self.client.get("/api/difficulties").await
    }

    /// Allergies recorded in the signed-in user's profile
    pub async fn user_allergies(&self) -> SdkResult<Vec<Allergy>> {
        let response: UserAllergiesResponse = self.client.get("/api/user-allergies").await?;
        Ok(response.user_allergies)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserAllergiesResponse {
    #[serde(default)]
    user_allergies: Vec<Allergy>,
}
