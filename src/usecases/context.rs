use std::sync::Arc;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    api::HttpApi,
    domain::{session::Session, user::SessionUser},
    infra::{config::AppConfig, session_store::FileSessionStore, storage_layout::StorageLayout},
};

use super::session_gate::{RestoreOutcome, SessionError, SessionGate};

/// Everything a command needs, built once at start-up.
///
/// The session gate and the HTTP adapter are kept in step: every change of
/// the session updates the bearer token the adapter sends.
pub struct AppContext {
    pub config: AppConfig,
    pub layout: StorageLayout,
    pub api: Arc<HttpApi>,
    session: SessionGate<FileSessionStore>,
    _log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        layout: StorageLayout,
        api: Arc<HttpApi>,
        session: SessionGate<FileSessionStore>,
        log_guard: Option<WorkerGuard>,
    ) -> Self {
        Self {
            config,
            layout,
            api,
            session,
            _log_guard: log_guard,
        }
    }

    pub fn session(&self) -> &SessionGate<FileSessionStore> {
        &self.session
    }

    /// Loads the persisted session and revalidates it against the server.
    pub fn restore_session(&mut self) -> Result<RestoreOutcome, SessionError> {
        let outcome = self.session.restore(self.api.as_ref());
        self.sync_token();
        outcome
    }

    /// Restores the session and fails when none is left.
    pub fn require_session(&mut self) -> Result<Session, SessionError> {
        if self.restore_session()? == RestoreOutcome::Unverified {
            return Err(SessionError::Unverified);
        }
        self.session.require().cloned()
    }

    pub fn login_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, SessionError> {
        let user = self
            .session
            .login_with_password(self.api.as_ref(), email, password)
            .cloned();
        self.sync_token();
        user
    }

    pub fn logout(&mut self) -> Result<bool, SessionError> {
        let removed = self.session.logout();
        self.sync_token();
        removed
    }

    pub fn session_mut(&mut self) -> &mut SessionGate<FileSessionStore> {
        &mut self.session
    }

    fn sync_token(&self) {
        self.api.set_token(self.session.token().map(str::to_owned));
    }
}
