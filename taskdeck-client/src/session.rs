/// Client-side session state
///
/// The session is a small state machine rather than a nullable user:
///
/// ```text
/// Uninitialized -> Loading -> Authenticated(user)
///                          -> Anonymous
/// ```
///
/// `Loading` exists so a UI can hold a neutral state while the startup
/// session probe is in flight instead of flashing the anonymous view.
/// Logout is best-effort: the API call may fail, but the local state
/// always ends up `Anonymous`.

use crate::error::ClientError;
use crate::http::ApiClient;
use std::sync::Arc;
use taskdeck_shared::models::user::UserProfile;

/// Lifecycle of the client's knowledge about the current user
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No session probe has been attempted yet
    Uninitialized,

    /// Session probe in flight; render a loading state
    Loading,

    /// Probe or login resolved to a user
    Authenticated(UserProfile),

    /// Probe failed or the user logged out
    Anonymous,
}

/// Client-side session holder
pub struct Session {
    client: Arc<ApiClient>,
    state: SessionState,
}

impl Session {
    /// Creates an uninitialized session over the given client
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: SessionState::Uninitialized,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The authenticated user, if any
    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// True once the state has resolved to an authenticated user
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// Probes the server for an existing session
    ///
    /// Runs once at startup. Any failure, including transport errors,
    /// resolves to `Anonymous`; the caller cannot tell a missing session
    /// from an unreachable server and does not need to.
    pub async fn initialize(&mut self) {
        self.state = SessionState::Loading;

        self.state = match self.client.me().await {
            Ok(user) => SessionState::Authenticated(user),
            Err(_) => SessionState::Anonymous,
        };
    }

    /// Registers a new account
    ///
    /// Registration does not log in, so the session state is untouched.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ClientError> {
        self.client.register(username, email, password).await
    }

    /// Logs in and transitions to `Authenticated` on success
    ///
    /// On failure the state is left as it was and the error carries the
    /// server's message for display.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let user = self.client.login(email, password).await?;
        self.state = SessionState::Authenticated(user);

        Ok(())
    }

    /// Logs out
    ///
    /// The server call is best-effort; a failure is logged and swallowed
    /// because the client-visible session ends either way.
    pub async fn logout(&mut self) {
        if let Err(err) = self.client.logout().await {
            tracing::warn!("Logout request failed: {}", err);
        }

        self.state = SessionState::Anonymous;
    }
}
