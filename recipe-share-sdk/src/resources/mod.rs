//! SDK resource modules
//!
//! This module contains resource-specific clients for interacting with
//! different API endpoints.

pub mod bookmarks;
pub mod recipes;
pub mod reviews;
pub mod session;
pub mod taxonomy;

pub use bookmarks::BookmarksClient;
pub use recipes::RecipesClient;
pub use reviews::ReviewsClient;
pub use session::SessionClient;
pub use taxonomy::TaxonomyClient;
