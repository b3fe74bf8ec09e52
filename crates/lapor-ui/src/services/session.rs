//! Session slots in `localStorage` under the keys `token`, `role` and `name`.

use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use lapor_api_models::Role;
use lapor_client::{ClientError, Session, SessionProvider};

pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const ROLE_KEY: &str = "role";
pub(crate) const NAME_KEY: &str = "name";

/// Values are stored as plain strings, not JSON.
pub(crate) struct LocalStorageSession;

impl LocalStorageSession {
    fn read(key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                console::error!("session read failed", key, format!("{err:?}"));
                None
            }
        }
    }

    fn write(key: &str, value: Option<&str>) -> Result<(), ClientError> {
        let storage = LocalStorage::raw();
        let outcome = match value {
            Some(value) => storage.set_item(key, value),
            None => storage.remove_item(key),
        };
        outcome.map_err(|err| ClientError::Session {
            message: format!("{key}: {err:?}"),
        })
    }
}

impl SessionProvider for LocalStorageSession {
    fn session(&self) -> Session {
        Session {
            token: Self::read(TOKEN_KEY),
            role: Self::read(ROLE_KEY).as_deref().and_then(Role::parse),
            name: Self::read(NAME_KEY),
        }
    }

    fn store(&self, session: &Session) -> Result<(), ClientError> {
        Self::write(TOKEN_KEY, session.token.as_deref())?;
        Self::write(ROLE_KEY, session.role.map(Role::as_str))?;
        Self::write(NAME_KEY, session.name.as_deref())
    }

    fn clear(&self) -> Result<(), ClientError> {
        for key in [TOKEN_KEY, ROLE_KEY, NAME_KEY] {
            Self::write(key, None)?;
        }
        Ok(())
    }
}
