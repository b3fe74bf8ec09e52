//! Session slots persisted to a small JSON file between invocations.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lapor_api_models::Role;
use lapor_client::{ClientError, Session, SessionProvider};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// File-backed [`SessionProvider`].
pub(crate) struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub(crate) const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config dir>/lapor/session.json`.
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lapor").join("session.json"))
    }

    fn read(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "session file unreadable");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| {
                warn!(path = %self.path.display(), error = %err, "session file is corrupt; ignoring");
            })
            .ok()
    }
}

impl SessionProvider for FileSession {
    fn session(&self) -> Session {
        let stored = self.read().unwrap_or_default();
        Session {
            token: stored.token,
            role: stored.role.as_deref().and_then(Role::parse),
            name: stored.name,
        }
    }

    fn store(&self, session: &Session) -> Result<(), ClientError> {
        let stored = StoredSession {
            token: session.token.clone(),
            role: session.role.map(|role| role.as_str().to_string()),
            name: session.name.clone(),
        };
        let text = serde_json::to_string_pretty(&stored).map_err(|err| storage_error(&self.path, &err))?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| storage_error(parent, &err))?;
        }
        fs::write(&self.path, text).map_err(|err| storage_error(&self.path, &err))
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(&self.path, &err)),
        }
    }
}

fn storage_error(path: &Path, err: &dyn std::fmt::Display) -> ClientError {
    ClientError::Session {
        message: format!("{}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_slots_and_clears() {
        let dir = tempfile::tempdir().expect("temp dir");
        let provider = FileSession::new(dir.path().join("nested").join("session.json"));
        assert_eq!(provider.session(), Session::default());

        let session = Session {
            token: Some("tok".into()),
            role: Some(Role::Admin),
            name: Some("Admin Desa".into()),
        };
        provider.store(&session).expect("store");
        assert_eq!(provider.session(), session);

        provider.clear().expect("clear");
        provider.clear().expect("clearing twice is fine");
        assert_eq!(provider.session(), Session::default());
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write");
        assert!(!FileSession::new(path).session().is_authenticated());
    }
}
