//! Recipe detail page assembly

use crate::catalog::RecipeReader;
use crate::error::{SdkError, SdkResult};
use recipe_share_core::{RecipeDetail, RecipeId, Review, SessionContext};
use tracing::{debug, warn};

/// Actions only the recipe's author is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoringAction {
    Edit,
    Delete,
}

const AUTHOR_ACTIONS: &[AuthoringAction] = &[AuthoringAction::Edit, AuthoringAction::Delete];

/// A recipe together with the viewer looking at it
#[derive(Debug, Clone, PartialEq)]
pub struct RecipePage {
    recipe: RecipeDetail,
    viewer: SessionContext,
    is_author: bool,
}

impl RecipePage {
    /// Fetch the recipe and the viewer's session concurrently.
    ///
    /// A missing recipe is [`SdkError::NotFound`]. A failed session lookup
    /// degrades to an anonymous viewer.
    pub async fn load<R: RecipeReader + ?Sized>(reader: &R, id: &RecipeId) -> SdkResult<Self> {
        let (recipe, session) = tokio::join!(reader.recipe(id), reader.session());

        let recipe = recipe?.ok_or_else(|| SdkError::recipe_not_found(id.as_str()))?;
        let viewer = match session {
            Ok(session) => SessionContext::from(session),
            Err(e) => {
                warn!(error = %e, "Could not resolve session, continuing anonymously");
                SessionContext::anonymous()
            }
        };

        debug!(recipe_id = %id, authenticated = viewer.is_authenticated(), "Loaded recipe page");
        Ok(Self::new(recipe, viewer))
    }

    pub fn new(recipe: RecipeDetail, viewer: SessionContext) -> Self {
        let is_author = viewer.is_user(&recipe.user_id);
        Self {
            recipe,
            viewer,
            is_author,
        }
    }

    pub fn recipe(&self) -> &RecipeDetail {
        &self.recipe
    }

    pub fn viewer(&self) -> &SessionContext {
        &self.viewer
    }

    pub fn is_author(&self) -> bool {
        self.is_author
    }

    pub fn average_rating(&self) -> f64 {
        self.recipe.average_rating()
    }

    pub fn rating_summary(&self) -> Option<String> {
        self.recipe.rating_summary()
    }

    pub fn authoring_actions(&self) -> &'static [AuthoringAction] {
        if self.is_author {
            AUTHOR_ACTIONS
        } else {
            &[]
        }
    }

    /// Authors cannot review their own recipe
    pub fn can_review(&self) -> bool {
        self.viewer.is_authenticated() && !self.is_author
    }

    pub fn can_edit_review(&self, review: &Review) -> bool {
        self.viewer.is_user(&review.user_id)
    }

    pub fn own_review(&self) -> Option<&Review> {
        self.recipe
            .reviews
            .iter()
            .find(|review| self.can_edit_review(review))
    }

    /// Insert a freshly posted review, or replace the edited one
    pub fn apply_review(&mut self, review: Review) {
        match self.recipe.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(existing) => *existing = review,
            None => self.recipe.reviews.insert(0, review),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockRecipeReader;
    use recipe_share_core::{Session, UserSummary};
    use serde_json::json;

    fn recipe(ratings: &[(u8, &str)]) -> RecipeDetail {
        let reviews: Vec<_> = ratings
            .iter()
            .enumerate()
            .map(|(i, (rating, user))| {
                json!({
                    "id": format!("rv{}", i),
                    "rating": rating,
                    "userId": user,
                    "user": { "id": user, "name": user },
                    "createdAt": "2024-06-01T08:00:00Z",
                    "updatedAt": "2024-06-01T08:00:00Z"
                })
            })
            .collect();
        serde_json::from_value(json!({
            "id": "rec_9",
            "title": "Brudet",
            "preparationTime": 90,
            "servings": 4,
            "userId": "chef",
            "user": { "id": "chef", "name": "Ivo" },
            "reviews": reviews
        }))
        .unwrap()
    }

    fn session(user: &str) -> Session {
        Session {
            user: UserSummary {
                id: user.into(),
                name: None,
                image: None,
            },
        }
    }

    #[tokio::test]
    async fn test_author_gets_authoring_actions() {
        let mut reader = MockRecipeReader::new();
        reader
            .expect_recipe()
            .returning(|_| Ok(Some(recipe(&[(5, "gost")]))));
        reader.expect_session().returning(|| Ok(Some(session("chef"))));

        let page = RecipePage::load(&reader, &RecipeId::from("rec_9"))
            .await
            .unwrap();

        assert!(page.is_author());
        assert_eq!(page.authoring_actions(), AUTHOR_ACTIONS);
        assert!(!page.can_review());
    }

    #[tokio::test]
    async fn test_visitor_can_edit_only_own_review() {
        let mut reader = MockRecipeReader::new();
        reader
            .expect_recipe()
            .returning(|_| Ok(Some(recipe(&[(5, "ana"), (3, "marko"), (4, "iva")]))));
        reader.expect_session().returning(|| Ok(Some(session("marko"))));

        let page = RecipePage::load(&reader, &RecipeId::from("rec_9"))
            .await
            .unwrap();

        assert!(!page.is_author());
        assert!(page.authoring_actions().is_empty());
        assert!(page.can_review());
        assert_eq!(page.average_rating(), 4.0);

        let editable: Vec<bool> = page
            .recipe()
            .reviews
            .iter()
            .map(|r| page.can_edit_review(r))
            .collect();
        assert_eq!(editable, vec![false, true, false]);
        assert_eq!(page.own_review().map(|r| r.rating), Some(3));
    }

    #[tokio::test]
    async fn test_missing_recipe_is_terminal() {
        let mut reader = MockRecipeReader::new();
        reader.expect_recipe().returning(|_| Ok(None));
        reader.expect_session().returning(|| Ok(None));

        let error = RecipePage::load(&reader, &RecipeId::from("nope"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SdkError::NotFound { ref resource_type, ref resource_id }
                if resource_type == "recipe" && resource_id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_session_failure_means_anonymous() {
        let mut reader = MockRecipeReader::new();
        reader.expect_recipe().returning(|_| Ok(Some(recipe(&[]))));
        reader
            .expect_session()
            .returning(|| Err(SdkError::ServerError("auth down".to_string())));

        let page = RecipePage::load(&reader, &RecipeId::from("rec_9"))
            .await
            .unwrap();

        assert!(!page.viewer().is_authenticated());
        assert!(!page.can_review());
        assert_eq!(page.rating_summary(), None);
    }

    #[test]
    fn test_apply_review_recomputes_average() {
        let mut page = RecipePage::new(recipe(&[(2, "ana")]), SessionContext::authenticated(session("ana")));
        let mut edited = page.own_review().cloned().unwrap();
        edited.rating = 4;
        page.apply_review(edited);

        assert_eq!(page.recipe().reviews.len(), 1);
        assert_eq!(page.average_rating(), 4.0);
    }
}
