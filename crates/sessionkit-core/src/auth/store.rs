use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::AuthError;
use super::persistence::PersistenceBridge;
use super::session::{Session, SessionHandle};
use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{Credentials, LoginResponse, ProfileResponse, User};
use crate::navigation::Navigator;
use crate::preferences::PreferenceStore;

/// Owner of the session and the only writer of the persisted token.
pub struct CredentialStore {
    api: ApiClient,
    session: SessionHandle,
    bridge: Arc<PersistenceBridge>,
    preferences: Arc<PreferenceStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    login_endpoint: String,
    profile_endpoint: String,
    token_ttl: Duration,
}

impl CredentialStore {
    pub fn new(
        config: &Config,
        api: ApiClient,
        session: SessionHandle,
        bridge: Arc<PersistenceBridge>,
        preferences: Arc<PreferenceStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            bridge,
            preferences,
            navigator,
            login_route: config.login_route.clone(),
            login_endpoint: config.login_endpoint.clone(),
            profile_endpoint: config.profile_endpoint.clone(),
            token_ttl: config.token_ttl(),
        }
    }

    /// Authenticate and establish a new session.
    ///
    /// A login while already authenticated replaces the previous session. On
    /// failure nothing changes and the request error is returned as is.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let data: LoginResponse = self
            .api
            .post(&self.login_endpoint, credentials)
            .await
            .map_err(|e| {
                warn!(error = %e, "Login failed");
                AuthError::Rejected(e)
            })?;

        if let Err(e) = self.bridge.write(&data.token, self.token_ttl) {
            warn!(error = %e, "Failed to persist session token");
        }
        let previous = self.session.identity_key();
        if previous.is_some() && previous.as_deref() != Some(data.user.identity_key().as_str()) {
            self.preferences.clear_cache();
        }
        let session = self.session.establish(data.token, data.user);

        info!(
            user = session.user.as_ref().map(User::display_name).unwrap_or_default(),
            "Logged in"
        );
        Ok(session)
    }

    /// Refresh the user profile with the active token.
    ///
    /// Fail-closed: any failure (expired token, network error, server error)
    /// is treated as an invalid session and logs out. A transient network
    /// blip therefore ends the session too.
    pub async fn fetch_profile(&self) -> Result<User, AuthError> {
        match self.api.get::<ProfileResponse>(&self.profile_endpoint).await {
            Ok(profile) => {
                if !self.session.set_user(profile.user.clone()) {
                    debug!("Profile fetched before a token was adopted; not stored");
                }
                Ok(profile.user)
            }
            Err(e) => {
                warn!(error = %e, "Profile fetch failed, ending session");
                self.logout();
                Err(AuthError::SessionInvalid(e))
            }
        }
    }

    /// Clear the session, the preference cache, and the persisted token, then
    /// send the user to the login route. Safe to call repeatedly.
    pub fn logout(&self) {
        self.session.clear();
        self.preferences.clear_cache();
        if let Err(e) = self.bridge.clear() {
            warn!(error = %e, "Failed to clear persisted session token");
        }
        info!("Logged out");
        self.navigator.navigate_to(&self.login_route);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session(&self) -> Session {
        self.session.snapshot()
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.session
    }
}
