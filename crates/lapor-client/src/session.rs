//! Client-held session state and the provider seam that persists it.

use std::cell::RefCell;

use lapor_api_models::Role;

use crate::error::ClientError;

/// Token plus cached role and display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Opaque bearer token.
    pub token: Option<String>,
    /// Role reported at login.
    pub role: Option<Role>,
    /// Display name reported at login.
    pub name: Option<String>,
}

impl Session {
    /// Token when present and not blank.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Whether a usable token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    /// Whether edit and delete controls should be shown.
    ///
    /// This is presentation gating only; the server enforces authorization.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Display name when present and not blank.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Avatar initials: first letters of up to two name words, else the role
    /// initial, else `U`.
    #[must_use]
    pub fn initials(&self) -> String {
        if let Some(name) = self.display_name() {
            return name
                .split_whitespace()
                .take(2)
                .filter_map(|word| word.chars().next())
                .flat_map(char::to_uppercase)
                .collect();
        }
        self.role
            .and_then(|role| role.as_str().chars().next())
            .map_or_else(|| "U".to_string(), |c| c.to_uppercase().collect())
    }
}

/// Durable storage for the session slots (`token`, `role`, `name`).
///
/// Components read through this seam instead of touching storage directly so
/// they can be exercised with in-memory sessions.
pub trait SessionProvider {
    /// Current session; missing slots read as `None`.
    fn session(&self) -> Session;

    /// Persist every slot of `session`, removing slots that are `None`.
    ///
    /// # Errors
    /// Returns [`ClientError::Session`] when the backing store rejects the write.
    fn store(&self, session: &Session) -> Result<(), ClientError>;

    /// Remove every slot.
    ///
    /// # Errors
    /// Returns [`ClientError::Session`] when the backing store rejects the removal.
    fn clear(&self) -> Result<(), ClientError>;
}

/// Session kept in process memory.
#[derive(Debug, Default)]
pub struct MemorySession {
    inner: RefCell<Session>,
}

impl MemorySession {
    /// Start with the given session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self {
            inner: RefCell::new(session),
        }
    }
}

impl SessionProvider for MemorySession {
    fn session(&self) -> Session {
        self.inner.borrow().clone()
    }

    fn store(&self, session: &Session) -> Result<(), ClientError> {
        *self.inner.borrow_mut() = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.inner.borrow_mut() = Session::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: Option<&str>, role: Option<Role>) -> Session {
        Session {
            token: Some("t".into()),
            role,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn initials_fall_back_from_name_to_role() {
        assert_eq!(named(Some("siti nur aisyah"), None).initials(), "SN");
        assert_eq!(named(Some("Budi"), Some(Role::Admin)).initials(), "B");
        assert_eq!(named(Some("   "), Some(Role::Admin)).initials(), "A");
        assert_eq!(named(None, None).initials(), "U");
    }

    #[test]
    fn blank_token_is_not_authenticated() {
        let session = Session {
            token: Some("  ".into()),
            ..Session::default()
        };
        assert!(!session.is_authenticated());
        assert!(named(None, None).is_authenticated());
        assert!(named(None, Some(Role::Admin)).is_admin());
        assert!(!named(None, Some(Role::User)).is_admin());
    }

    #[test]
    fn memory_session_clears_all_slots() {
        let provider = MemorySession::new(named(Some("Sari"), Some(Role::User)));
        provider.clear().expect("clear");
        assert_eq!(provider.session(), Session::default());
    }
}
