use std::sync::Arc;

use review_core::model::User;
use storage::repository::{ClientStateRepository, StorageKey};

use crate::api::ExamApi;
use crate::error::AuthError;
use crate::google_sign_in::extract_credential;
use crate::session_store::SessionStore;

/// Sign-in, session restore and sign-out.
///
/// The bearer token lives in three places that must agree: persistent
/// client state, the API wrapper, and (implicitly) the session store.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn ExamApi>,
    state: Arc<dyn ClientStateRepository>,
    session: Arc<SessionStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        api: Arc<dyn ExamApi>,
        state: Arc<dyn ClientStateRepository>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            api,
            state,
            session,
        }
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    /// Exchange a Google credential for an application session.
    ///
    /// On failure the session store returns to signed-out and carries the
    /// message to show.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredential` for blank input (no request is
    /// made), otherwise any API or storage failure.
    pub async fn login_with_google(&self, raw_credential: &str) -> Result<User, AuthError> {
        let result = self.exchange(raw_credential).await;
        match &result {
            Ok(user) => {
                tracing::info!(user_id = %user.id(), admin = user.is_admin(), "signed in");
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign-in failed");
                self.session.fail(err.user_message());
            }
        }
        result
    }

    async fn exchange(&self, raw_credential: &str) -> Result<User, AuthError> {
        let credential = extract_credential(raw_credential).ok_or(AuthError::MissingCredential)?;
        self.session.begin_authentication();

        let response = self.api.login_with_google(&credential).await?;
        let token = response.access_token.trim().to_string();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.api.set_bearer_token(Some(token.clone()));

        let user = match response.user {
            Some(user) => Ok(user),
            None => self.api.current_user().await.map_err(AuthError::from),
        };
        let persisted = match user {
            Ok(user) => self
                .state
                .set(StorageKey::Token, &token)
                .await
                .map(|()| user)
                .map_err(AuthError::from),
            Err(err) => Err(err),
        };
        if persisted.is_err() {
            self.api.set_bearer_token(None);
        }
        let user = persisted?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Resume a persisted session at startup.
    ///
    /// Returns `Ok(None)` when there is no stored token or the backend
    /// rejected it (the token is then discarded).
    ///
    /// # Errors
    ///
    /// Returns `AuthError` for storage failures and for API failures other
    /// than 401; the stored token is kept in that case.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.state.get(StorageKey::Token).await? else {
            tracing::debug!("no stored session");
            return Ok(None);
        };
        self.api.set_bearer_token(Some(token));
        self.session.begin_authentication();

        match self.api.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = %user.id(), "session restored");
                self.session.set_user(user.clone());
                Ok(Some(user))
            }
            Err(err) if err.is_unauthorized() => {
                tracing::info!("stored session rejected; signing out");
                self.discard_token().await?;
                self.session.clear();
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not restore session");
                self.session.clear();
                Err(err.into())
            }
        }
    }

    /// Re-read the signed-in user from the backend.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if `/auth/me` fails; the session is left as is.
    pub async fn refresh_user(&self) -> Result<User, AuthError> {
        let user = self.api.current_user().await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Sign out: forget the token everywhere.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored token cannot be removed;
    /// the in-process session is cleared regardless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.api.set_bearer_token(None);
        self.session.clear();
        self.state.remove(StorageKey::Token).await?;
        tracing::info!("signed out");
        Ok(())
    }

    async fn discard_token(&self) -> Result<(), AuthError> {
        self.api.set_bearer_token(None);
        self.state.remove(StorageKey::Token).await?;
        Ok(())
    }
}
