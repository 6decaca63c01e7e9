//! Persisted session: `session.json` next to a lock file.
//!
//! Readers take a shared lock and writers an exclusive one, so two `pdesk`
//! processes never observe a half-written session.

use std::{
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{
    domain::session::Session,
    infra::{contracts::SessionStore, error::AppError, storage_layout::StorageLayout},
};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(layout: &StorageLayout) -> Self {
        Self {
            path: layout.session_file(),
            lock_path: layout.session_lock_file(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_lock(&self) -> Result<File, AppError> {
        if let Some(parent) = self.lock_path.parent() {
            fs::create_dir_all(parent).map_err(|source| AppError::StorageDirCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| self.io_error(&self.lock_path, source))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> AppError {
        AppError::SessionIo {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        let lock = self.open_lock()?;
        FileExt::lock_shared(&lock).map_err(|source| self.io_error(&self.lock_path, source))?;

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(&self.path, source)),
        };
        drop(lock);

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| AppError::SessionFormat {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(session).map_err(|source| AppError::SessionFormat {
            path: self.path.clone(),
            source,
        })?;

        let lock = self.open_lock()?;
        FileExt::lock_exclusive(&lock).map_err(|source| self.io_error(&self.lock_path, source))?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|source| self.io_error(&staging, source))?;
        restrict_permissions(&staging);
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(&self.path, source))?;

        drop(lock);
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        let lock = self.open_lock()?;
        FileExt::lock_exclusive(&lock).map_err(|source| self.io_error(&self.lock_path, source))?;

        let removed = match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(source) if source.kind() == ErrorKind::NotFound => false,
            Err(source) => return Err(self.io_error(&self.path, source)),
        };

        drop(lock);
        Ok(removed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(error) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!(path = %path.display(), error = %error, "could not restrict session file permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Session store kept in memory; used when nothing may touch the disk.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: std::sync::Mutex<Option<Session>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: std::sync::Mutex::new(Some(session)),
        }
    }

    pub fn stored(&self) -> Option<Session> {
        self.session.lock().expect("memory store lock").clone()
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, AppError> {
        Ok(self.stored())
    }

    fn save(&self, session: &Session) -> Result<(), AppError> {
        *self.session.lock().expect("memory store lock") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        Ok(self.session.lock().expect("memory store lock").take().is_some())
    }
}
