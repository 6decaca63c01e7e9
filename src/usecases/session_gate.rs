//! Session gate: nothing behind it runs without a token.
//!
//! The persisted session is trusted optimistically on start and then
//! revalidated against the profile endpoint. Any revalidation failure clears
//! the stored session and logs the user out.

use crate::{
    domain::{
        session::Session,
        user::{SessionUser, UserPatch},
    },
    infra::{contracts::SessionStore, error::AppError},
};

const SESSION_REVALIDATION_FAILED: &str = "SESSION_REVALIDATION_FAILED";
const SESSION_EXPIRED: &str = "SESSION_EXPIRED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

pub trait ProfileSource {
    fn fetch_profile(&self, token: &str) -> Result<SessionUser, ProfileSourceError>;
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn fetch_profile(&self, token: &str) -> Result<SessionUser, ProfileSourceError> {
        (*self).fetch_profile(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSourceError {
    InvalidCredentials,
    Rejected(String),
    Unavailable,
    InvalidData,
}

pub trait CredentialsSource {
    fn login(&self, email: &str, password: &str) -> Result<Session, CredentialsSourceError>;
}

impl<T: CredentialsSource + ?Sized> CredentialsSource for &T {
    fn login(&self, email: &str, password: &str) -> Result<Session, CredentialsSourceError> {
        (*self).login(email, password)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was persisted.
    NoSession,
    /// The server confirmed the token; the stored profile was refreshed.
    Revalidated,
    /// The server refused the token; local state was cleared.
    Expired,
    /// Revalidation failed for another reason; local state was cleared.
    Unverified,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not logged in, run `pdesk login`")]
    NotLoggedIn,
    #[error("could not verify the stored session, run `pdesk login`")]
    Unverified,
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("server is temporarily unavailable")]
    TemporarilyUnavailable,
    #[error("unexpected response from server")]
    DataContractViolation,
    #[error(transparent)]
    Store(#[from] AppError),
}

pub struct SessionGate<S: SessionStore> {
    store: S,
    session: Option<Session>,
}

impl<S: SessionStore> SessionGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    pub fn require(&self) -> Result<&Session, SessionError> {
        self.session.as_ref().ok_or(SessionError::NotLoggedIn)
    }

    pub fn restore(&mut self, profile: &dyn ProfileSource) -> Result<RestoreOutcome, SessionError> {
        let Some(stored) = self.store.load()? else {
            self.session = None;
            return Ok(RestoreOutcome::NoSession);
        };

        let token = stored.token.clone();
        self.session = Some(stored);

        match profile.fetch_profile(&token) {
            Ok(user) => {
                self.login(token, user)?;
                Ok(RestoreOutcome::Revalidated)
            }
            Err(ProfileSourceError::Unauthorized) => {
                tracing::info!(code = SESSION_EXPIRED, "stored session was refused, logging out");
                self.logout()?;
                Ok(RestoreOutcome::Expired)
            }
            Err(error) => {
                tracing::warn!(
                    code = SESSION_REVALIDATION_FAILED,
                    error = ?error,
                    "session revalidation failed, logging out"
                );
                self.logout()?;
                Ok(RestoreOutcome::Unverified)
            }
        }
    }

    pub fn login(&mut self, token: impl Into<String>, user: SessionUser) -> Result<(), SessionError> {
        let session = Session::new(token, user);
        self.store.save(&session)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn login_with_password(
        &mut self,
        credentials: &dyn CredentialsSource,
        email: &str,
        password: &str,
    ) -> Result<&SessionUser, SessionError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let session = credentials
            .login(email, password)
            .map_err(map_credentials_error)?;
        self.login(session.token, session.user)?;

        self.require().map(|session| &session.user)
    }

    /// Returns whether a persisted session was removed.
    pub fn logout(&mut self) -> Result<bool, SessionError> {
        self.session = None;
        Ok(self.store.clear()?)
    }

    /// Merges the provided fields into the session user and persists it.
    pub fn update_user(&mut self, patch: UserPatch) -> Result<&SessionUser, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NotLoggedIn)?;
        if !patch.is_empty() {
            patch.apply_to(&mut session.user);
            self.store.save(session)?;
        }

        Ok(&session.user)
    }
}

fn map_credentials_error(error: CredentialsSourceError) -> SessionError {
    match error {
        CredentialsSourceError::InvalidCredentials => SessionError::InvalidCredentials,
        CredentialsSourceError::Rejected(message) => SessionError::Rejected(message),
        CredentialsSourceError::Unavailable => SessionError::TemporarilyUnavailable,
        CredentialsSourceError::InvalidData => SessionError::DataContractViolation,
    }
}
