// Session state shared by commands and the interactive UI

use anyhow::Result;

use crate::api::{ApiClient, ApiError, AuthResponse};
use crate::config::{ApiConfig, Config};
use crate::models::User;

/// The authenticated user and credential for the lifetime of the program.
///
/// Owned by whoever drives the views and passed to them by reference. The
/// session also owns the API client so the bearer token always matches the
/// current user.
#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    config: Config,
    user: Option<User>,
}

impl Session {
    /// Build a session from configuration, rehydrating a persisted login
    pub fn restore(config: Config) -> Result<Self> {
        let api = config.api.clone();
        Self::restore_with_api(config, &api)
    }

    /// Like [`Session::restore`] but talking to the backend described by
    /// `api`. The persisted `[api]` section is left as it is.
    pub fn restore_with_api(config: Config, api: &ApiConfig) -> Result<Self> {
        let mut api = ApiClient::new(api)?;

        let user = if config.is_authenticated() {
            api.set_token(Some(config.auth.token.clone()));
            config.auth.user.clone()
        } else {
            None
        };

        if let Some(user) = &user {
            tracing::debug!("Restored session for {}", user.email);
        }

        Ok(Self { api, config, user })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Authenticate with email and password and keep the resulting session
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ApiError> {
        let response = self.api.login(email, password).await?;
        Ok(self.establish(response))
    }

    /// Create an account; the new account is signed in straight away
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<&User, ApiError> {
        let response = self.api.signup(name, email, password).await?;
        Ok(self.establish(response))
    }

    /// Adopt the result of a successful login or signup.
    ///
    /// A failure to persist is logged and does not undo the in-memory session.
    pub fn establish(&mut self, response: AuthResponse) -> &User {
        let AuthResponse { user, token } = response;
        tracing::info!("Signed in as {} ({})", user.email, user.role);

        self.api.set_token(Some(token.clone()));
        self.config.set_session(token, user.clone());
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to persist session: {:#}", e);
        }

        self.user.insert(user)
    }

    /// Drop the session in memory and on disk
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user.email);
        }

        self.api.set_token(None);
        self.config.clear_session();
        if let Err(e) = self.config.save() {
            tracing::warn!("Failed to clear persisted session: {:#}", e);
        }
    }
}
