use serde::{Deserialize, Serialize};

use crate::domain::ids::UserId;

/// Public profile of a user as embedded in recipes, reviews and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl UserSummary {
    /// Name to show, or an empty string for users without one.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Upper-cased first letter of the name, used when there is no avatar image.
    pub fn initial(&self) -> Option<char> {
        self.name
            .as_deref()
            .and_then(|name| name.chars().next())
            .and_then(|c| c.to_uppercase().next())
    }
}

/// An authenticated session as returned by the session accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserSummary,
}

/// The viewer's session, passed explicitly to every component that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn authenticated(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.session.as_ref().map(|s| &s.user.id)
    }

    /// Whether the viewer is the given user.
    pub fn is_user(&self, user_id: &UserId) -> bool {
        self.user_id() == Some(user_id)
    }
}

impl From<Option<Session>> for SessionContext {
    fn from(session: Option<Session>) -> Self {
        Self { session }
    }
}
