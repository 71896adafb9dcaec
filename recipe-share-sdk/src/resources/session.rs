//! Session accessor

use crate::client::HttpClient;
use crate::error::{SdkError, SdkResult};
use recipe_share_core::{Session, SessionContext};
use std::sync::Arc;

/// Client for the auth provider's session endpoint
#[derive(Debug, Clone)]
pub struct SessionClient {
    client: Arc<HttpClient>,
}

impl SessionClient {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// The current session, `None` when browsing anonymously.
    ///
    /// An expired or rejected token is reported as no session rather than
    /// as an error.
    pub async fn current(&self) -> SdkResult<Option<Session>> {
        match self.client.get::<Option<Session>>("/api/auth/get-session").await {
            Err(SdkError::AuthenticationError(_)) => Ok(None),
            other => other,
        }
    }

    /// Same as [`current`](Self::current), wrapped as a viewer context
    pub async fn context(&self) -> SdkResult<SessionContext> {
        self.current().await.map(SessionContext::from)
    }
}
