//! Filter option loader
//!
//! Loads the three filter vocabularies concurrently and, for signed-in
//! viewers, pre-selects the allergies saved in their profile.

use crate::catalog::RecipeCatalog;
use crate::error::SdkResult;
use crate::listing::store::FilterStore;
use crate::notify::{
    Notification, Notifier, ALLERGIES_FETCH_FAILED, CATEGORIES_FETCH_FAILED,
    DIFFICULTIES_FETCH_FAILED,
};
use recipe_share_core::{SelectableItem, SessionContext};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// One vocabulary of the filter panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionList {
    pub items: Vec<SelectableItem>,
    pub loading: bool,
}

impl OptionList {
    pub fn pending() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
        }
    }

    pub fn ready(items: Vec<SelectableItem>) -> Self {
        Self {
            items,
            loading: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub categories: OptionList,
    pub allergies: OptionList,
    pub difficulties: OptionList,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            categories: OptionList::pending(),
            allergies: OptionList::pending(),
            difficulties: OptionList::pending(),
        }
    }
}

impl FilterOptions {
    pub fn is_loading(&self) -> bool {
        self.categories.loading || self.allergies.loading || self.difficulties.loading
    }
}

pub struct FilterOptionLoader<C: ?Sized> {
    catalog: Arc<C>,
    notifier: Arc<dyn Notifier>,
    allergies_seeded: AtomicBool,
}

impl<C: RecipeCatalog + ?Sized> FilterOptionLoader<C> {
    pub fn new(catalog: Arc<C>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            catalog,
            notifier,
            allergies_seeded: AtomicBool::new(false),
        }
    }

    /// Fetch all vocabularies and the viewer's allergy profile at once.
    ///
    /// Each list is published as soon as it arrives and fails on its own.
    pub async fn load(
        &self,
        options: &watch::Sender<FilterOptions>,
        store: &FilterStore,
        session: &SessionContext,
        address_has_allergy_ids: bool,
    ) {
        tokio::join!(
            async {
                let result = self.catalog.categories().await;
                let items = self.items_or_notify(result, "categories", CATEGORIES_FETCH_FAILED);
                options.send_modify(|o| o.categories = OptionList::ready(items));
            },
            async {
                let result = self.catalog.allergies().await;
                let items = self.items_or_notify(result, "allergies", ALLERGIES_FETCH_FAILED);
                options.send_modify(|o| o.allergies = OptionList::ready(items));
            },
            async {
                let result = self.catalog.difficulties().await;
                let items =
                    self.items_or_notify(result, "difficulties", DIFFICULTIES_FETCH_FAILED);
                options.send_modify(|o| o.difficulties = OptionList::ready(items));
            },
            self.seed_user_allergies(store, session, address_has_allergy_ids),
        );
    }

    /// Write the viewer's saved allergies into the store.
    ///
    /// Runs at most once per loader, only for signed-in viewers, and only
    /// when the address did not name allergies itself. Returns whether the
    /// store was written.
    pub async fn seed_user_allergies(
        &self,
        store: &FilterStore,
        session: &SessionContext,
        address_has_allergy_ids: bool,
    ) -> bool {
        if address_has_allergy_ids || !session.is_authenticated() {
            return false;
        }
        if self.allergies_seeded.swap(true, Ordering::SeqCst) {
            return false;
        }

        match self.catalog.user_allergies().await {
            Ok(allergies) if allergies.is_empty() => false,
            Ok(allergies) => {
                info!(count = allergies.len(), "Pre-selecting saved allergies");
                store.set_allergy_ids(allergies.into_iter().map(|a| a.id));
                true
            }
            Err(e) => {
                warn!(error = %e, "Error fetching user allergies");
                false
            }
        }
    }

    fn items_or_notify<T>(
        &self,
        result: SdkResult<Vec<T>>,
        vocabulary: &str,
        message: &str,
    ) -> Vec<SelectableItem>
    where
        for<'a> SelectableItem: From<&'a T>,
    {
        match result {
            Ok(values) => values.iter().map(SelectableItem::from).collect(),
            Err(e) => {
                error!(vocabulary, error = %e, "Error fetching filter options");
                self.notifier.notify(Notification::error(message));
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockRecipeCatalog;
    use crate::error::SdkError;
    use crate::notify::ChannelNotifier;
    use recipe_share_core::{Allergy, AllergyId, Category, Difficulty, Session, UserSummary};

    fn signed_in() -> SessionContext {
        SessionContext::authenticated(Session {
            user: UserSummary {
                id: "u1".into(),
                name: Some("Ana".to_string()),
                image: None,
            },
        })
    }

    fn vocabularies(mock: &mut MockRecipeCatalog) {
        mock.expect_categories().returning(|| {
            Ok(vec![Category {
                id: "c1".into(),
                name: "Deserti".to_string(),
            }])
        });
        mock.expect_difficulties().returning(|| {
            Ok(vec![Difficulty {
                id: "d1".into(),
                name: "Lagano".to_string(),
                level: 1,
            }])
        });
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let mut mock = MockRecipeCatalog::new();
        vocabularies(&mut mock);
        mock.expect_allergies()
            .returning(|| Err(SdkError::ServerError("down".to_string())));
        mock.expect_user_allergies().never();

        let (notifier, mut notifications) = ChannelNotifier::channel();
        let loader = FilterOptionLoader::new(Arc::new(mock), Arc::new(notifier));
        let (tx, rx) = watch::channel(FilterOptions::default());
        let store = FilterStore::default();

        loader
            .load(&tx, &store, &SessionContext::anonymous(), false)
            .await;

        let options = rx.borrow().clone();
        assert!(!options.is_loading());
        assert_eq!(options.categories.items[0].name, "Deserti");
        assert_eq!(options.difficulties.items[0].name, "Lagano (razina 1)");
        assert!(options.allergies.items.is_empty());

        assert_eq!(
            notifications.try_recv().unwrap(),
            Notification::error("Error fetching allergies")
        );
        assert!(notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_seeds_saved_allergies_once() {
        let mut mock = MockRecipeCatalog::new();
        mock.expect_user_allergies().times(1).returning(|| {
            Ok(vec![Allergy {
                id: "a7".into(),
                name: "Orašasti plodovi".to_string(),
            }])
        });

        let loader = FilterOptionLoader::new(
            Arc::new(mock),
            Arc::new(crate::notify::NullNotifier),
        );
        let store = FilterStore::default();
        let session = signed_in();

        assert!(loader.seed_user_allergies(&store, &session, false).await);
        assert!(!loader.seed_user_allergies(&store, &session, false).await);
        assert!(store.criteria().allergy_ids.contains(&AllergyId::from("a7")));
        assert_eq!(store.revision(), 1);
    }

    #[tokio::test]
    async fn test_address_allergies_win() {
        let mut mock = MockRecipeCatalog::new();
        mock.expect_user_allergies().never();

        let loader = FilterOptionLoader::new(
            Arc::new(mock),
            Arc::new(crate::notify::NullNotifier),
        );
        let store = FilterStore::default();

        assert!(!loader.seed_user_allergies(&store, &signed_in(), true).await);
        assert!(
            !loader
                .seed_user_allergies(&store, &SessionContext::anonymous(), false)
                .await
        );
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_profile_failure_is_only_logged() {
        let mut mock = MockRecipeCatalog::new();
        mock.expect_user_allergies()
            .returning(|| Err(SdkError::AuthenticationError("expired".to_string())));

        let (notifier, mut notifications) = ChannelNotifier::channel();
        let loader = FilterOptionLoader::new(Arc::new(mock), Arc::new(notifier));
        let store = FilterStore::default();

        assert!(!loader.seed_user_allergies(&store, &signed_in(), false).await);
        assert!(notifications.try_recv().is_err());
    }
}
