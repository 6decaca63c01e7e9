use anyhow::Result;

use crate::{
    domain::session::Session,
    infra::{config::AppConfig, error::AppError},
};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Local key-value home of the token and user blob.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>, AppError>;
    fn save(&self, session: &Session) -> Result<(), AppError>;
    /// Returns whether something was removed.
    fn clear(&self) -> Result<bool, AppError>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn load(&self) -> Result<Option<Session>, AppError> {
        (*self).load()
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        (*self).save(session)
    }

    fn clear(&self) -> Result<bool, AppError> {
        (*self).clear()
    }
}
