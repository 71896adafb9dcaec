//! Subcommand implementations

pub mod auth;
pub mod browse;
pub mod config;
pub mod recipes;
pub mod taxonomy;

use thiserror::Error;

/// Refusals decided locally, before any request is made
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Sign in first: run 'recipe-share auth login'")]
    NotSignedIn,

    #[error("Only the author of recipe '{0}' can do that")]
    NotAuthor(String),

    #[error("Authors cannot review their own recipe")]
    OwnRecipe,

    #[error("You have not reviewed recipe '{0}' yet")]
    NoOwnReview(String),
}
