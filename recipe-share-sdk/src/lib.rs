//! Recipe Share SDK
//!
//! This crate provides a Rust client for the Recipe Share web application.
//! It covers the REST endpoints behind recipe browsing, reviewing and
//! bookmarking, and implements the listing page's search, filter and
//! pagination flow as an explicit state machine.
//!
//! # Features
//!
//! - **Type-safe API clients**: Strongly-typed recipes, reviews, vocabularies and sessions
//! - **Debounced listing**: A single driver task owning the listing state, fed by a watch-based filter store
//! - **Stale response protection**: Every listing request carries a sequence number
//! - **Explicit session context**: Authorship checks take the viewer as a value
//! - **Optional retries**: Exponential backoff, off by default
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use recipe_share_sdk::{RecipeShareClient, SdkConfig};
//! use recipe_share_sdk::listing::ListingQuery;
//! use recipe_share_core::FilterCriteria;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RecipeShareClient::new(SdkConfig::new("https://recepti.example.com"))?;
//!
//!     let criteria = FilterCriteria::new().with_search_term("pasta").with_vegan(true);
//!     let page = client.recipes().list(&ListingQuery::from_criteria(&criteria, 1)).await?;
//!     println!("Found {} recipes", page.recipes.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Listing page
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recipe_share_sdk::{ListingPage, RecipeShareClient, SdkConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(RecipeShareClient::new(SdkConfig::new("https://recepti.example.com"))?);
//! let mut address = url::Url::parse("https://recepti.example.com/recipes?search=juha")?;
//!
//! let listing = ListingPage::new(client).mount(Some(&mut address));
//! let snapshot = listing.settled().await;
//! println!("{} recipes, more: {}", snapshot.recipes.len(), snapshot.has_more());
//!
//! listing.store().set_vegetarian(true);
//! let snapshot = listing.settled().await;
//! println!("{} vegetarian recipes", snapshot.recipes.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use recipe_share_sdk::{RecipeShareClient, SdkError};
//! use recipe_share_core::RecipeId;
//!
//! async fn show(client: &RecipeShareClient, id: &RecipeId) {
//!     match client.recipes().require(id).await {
//!         Ok(recipe) => println!("{}", recipe.title),
//!         Err(SdkError::NotFound { resource_id, .. }) => eprintln!("No recipe {}", resource_id),
//!         Err(SdkError::AuthenticationError(msg)) => eprintln!("Sign in first: {}", msg),
//!         Err(e) => eprintln!("Other error: {}", e),
//!     }
//! }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod client;
pub mod config;
pub mod detail;
pub mod error;
pub mod forms;
pub mod images;
pub mod listing;
pub mod notify;
pub mod resources;

pub use catalog::{RecipeCatalog, RecipeReader};
pub use client::HttpClient;
pub use config::{AuthConfig, SdkConfig};
pub use detail::{AuthoringAction, RecipePage};
pub use error::{SdkError, SdkResult};
pub use forms::parse_json_list;
pub use images::{BlobImageStore, ImageStore, ImageUpload};
pub use listing::{ListingHandle, ListingPage, ListingSnapshot};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, NullNotifier};

pub use resources::bookmarks::{BookmarkStatus, BookmarksClient};
pub use resources::recipes::{CreateRecipeRequest, CreatedRecipe, ListingResponse, RecipesClient};
pub use resources::reviews::ReviewsClient;
pub use resources::session::SessionClient;
pub use resources::taxonomy::TaxonomyClient;

use std::sync::Arc;

/// The main client for the Recipe Share API.
///
/// Resource clients share one HTTP client, so cloning is cheap.
///
/// # Example
///
/// ```rust,no_run
/// use recipe_share_sdk::{RecipeShareClient, SdkConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SdkConfig::new("https://recepti.example.com")
///     .with_session_token("token-from-login");
///
/// let client = RecipeShareClient::new(config)?;
/// let categories = client.taxonomy().categories().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecipeShareClient {
    http_client: Arc<HttpClient>,
    recipes: RecipesClient,
    taxonomy: TaxonomyClient,
    reviews: ReviewsClient,
    bookmarks: BookmarksClient,
    session: SessionClient,
}

impl RecipeShareClient {
    /// Create a new client with the given configuration.
    ///
    /// # Returns
    ///
    /// Returns a new client instance or an error if configuration is invalid.
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        let http_client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            recipes: RecipesClient::new(Arc::clone(&http_client)),
            taxonomy: TaxonomyClient::new(Arc::clone(&http_client)),
            reviews: ReviewsClient::new(Arc::clone(&http_client)),
            bookmarks: BookmarksClient::new(Arc::clone(&http_client)),
            session: SessionClient::new(Arc::clone(&http_client)),
            http_client,
        })
    }

    /// Create a new client using a builder pattern.
    ///
    /// ```rust,no_run
    /// use recipe_share_sdk::RecipeShareClient;
    /// use std::time::Duration;
    ///
    /// let client = RecipeShareClient::builder("https://recepti.example.com")
    ///     .with_session_token("token")
    ///     .with_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok::<(), recipe_share_sdk::SdkError>(())
    /// ```
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Recipe listing, detail, creation and deletion
    pub fn recipes(&self) -> &RecipesClient {
        &self.recipes
    }

    /// Categories, allergies, difficulties and the viewer's allergy profile
    pub fn taxonomy(&self) -> &TaxonomyClient {
        &self.taxonomy
    }

    pub fn reviews(&self) -> &ReviewsClient {
        &self.reviews
    }

    pub fn bookmarks(&self) -> &BookmarksClient {
        &self.bookmarks
    }

    /// The auth provider's session accessor
    pub fn auth(&self) -> &SessionClient {
        &self.session
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    pub fn config(&self) -> &SdkConfig {
        self.http_client.config()
    }

    /// Get the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.http_client.config().base_url
    }
}

/// Fluent construction of a [`RecipeShareClient`]. Settings not covered by a
/// shortcut go through [`ClientBuilder::configure`].
#[derive(Debug)]
pub struct ClientBuilder {
    config: SdkConfig,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SdkConfig::new(base_url),
        }
    }

    /// Apply any [`SdkConfig`] setter
    pub fn configure(mut self, apply: impl FnOnce(SdkConfig) -> SdkConfig) -> Self {
        self.config = apply(self.config);
        self
    }

    pub fn with_session_token(self, token: impl Into<String>) -> Self {
        self.configure(|c| c.with_session_token(token))
    }

    pub fn with_timeout(self, timeout: std::time::Duration) -> Self {
        self.configure(|c| c.with_timeout(timeout))
    }

    pub fn with_max_retries(self, max_retries: u32) -> Self {
        self.configure(|c| c.with_max_retries(max_retries))
    }

    pub fn with_logging(self, enable: bool) -> Self {
        self.configure(|c| c.with_logging(enable))
    }

    /// Validates the settings and builds the client
    pub fn build(self) -> SdkResult<RecipeShareClient> {
        RecipeShareClient::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = RecipeShareClient::builder("https://recepti.example.com")
            .with_session_token("tok")
            .with_timeout(std::time::Duration::from_secs(30))
            .with_max_retries(2)
            .with_logging(true)
            .configure(|c| c.with_blob_base_url("https://blob.example.com"))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://recepti.example.com");
        assert_eq!(client.config().max_retries, 2);
        assert_eq!(client.config().auth, AuthConfig::SessionToken("tok".to_string()));
        assert_eq!(
            client.config().blob_base_url.as_deref(),
            Some("https://blob.example.com")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(RecipeShareClient::builder("").build().is_err());
    }
}
