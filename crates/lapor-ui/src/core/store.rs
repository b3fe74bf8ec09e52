//! App-wide yewdux store.
//!
//! The session slice mirrors what the session provider persisted; pages read
//! it for guards and the navbar, and write it after login and logout.

use lapor_client::{ClientError, Session};
use yewdux::store::Store;

use crate::i18n::{DEFAULT_LOCALE, LocaleCode};

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral notice.
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

/// A transient notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Store-assigned identifier.
    pub id: u64,
    /// Severity.
    pub kind: ToastKind,
    /// Text shown to the user.
    pub message: String,
}

/// Global application store for shared state.
#[derive(Clone, Debug, PartialEq, Eq, Store)]
pub struct AppStore {
    /// Current session.
    pub session: Session,
    /// Visible toasts, oldest first.
    pub toasts: Vec<Toast>,
    /// Next toast identifier.
    pub next_toast_id: u64,
    /// Active locale.
    pub locale: LocaleCode,
}

impl Default for AppStore {
    fn default() -> Self {
        Self {
            session: Session::default(),
            toasts: Vec::new(),
            next_toast_id: 1,
            locale: DEFAULT_LOCALE,
        }
    }
}

/// Most toasts kept at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

/// Queue a toast and return its id.
pub fn push_toast(store: &mut AppStore, kind: ToastKind, message: impl Into<String>) -> u64 {
    let id = store.next_toast_id;
    store.next_toast_id += 1;
    store.toasts.push(Toast {
        id,
        kind,
        message: message.into(),
    });
    if store.toasts.len() > MAX_TOASTS {
        let overflow = store.toasts.len() - MAX_TOASTS;
        store.toasts.drain(..overflow);
    }
    id
}

/// Queue an error toast carrying the failure's user-facing text.
pub fn push_error(store: &mut AppStore, err: &ClientError) -> u64 {
    push_toast(store, ToastKind::Error, err.user_message())
}

/// Remove a toast by id; unknown ids are ignored.
pub fn dismiss_toast(store: &mut AppStore, id: u64) {
    store.toasts.retain(|toast| toast.id != id);
}

/// Replace the session after a successful login.
pub fn set_session(store: &mut AppStore, session: Session) {
    store.session = session;
}

/// Forget the session after logout.
pub fn clear_session(store: &mut AppStore) {
    store.session = Session::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapor_api_models::Role;

    #[test]
    fn toasts_get_increasing_ids_and_cap() {
        let mut store = AppStore::default();
        let first = push_toast(&mut store, ToastKind::Info, "satu");
        for n in 0..MAX_TOASTS {
            push_toast(&mut store, ToastKind::Success, format!("pesan {n}"));
        }
        assert_eq!(store.toasts.len(), MAX_TOASTS);
        assert!(store.toasts.iter().all(|toast| toast.id != first));
        assert_eq!(store.next_toast_id, first + MAX_TOASTS as u64 + 1);
    }

    #[test]
    fn dismiss_removes_only_matching_toast() {
        let mut store = AppStore::default();
        let keep = push_toast(&mut store, ToastKind::Info, "a");
        let drop_id = push_toast(&mut store, ToastKind::Info, "b");
        dismiss_toast(&mut store, drop_id);
        dismiss_toast(&mut store, 999);
        assert_eq!(store.toasts.len(), 1);
        assert_eq!(store.toasts[0].id, keep);
    }

    #[test]
    fn error_toasts_use_server_text() {
        let mut store = AppStore::default();
        push_error(
            &mut store,
            &ClientError::Rejected {
                status: 403,
                message: "Akses ditolak".into(),
            },
        );
        assert_eq!(store.toasts[0].kind, ToastKind::Error);
        assert_eq!(store.toasts[0].message, "Akses ditolak");
    }

    #[test]
    fn session_slice_round_trip() {
        let mut store = AppStore::default();
        set_session(
            &mut store,
            Session {
                token: Some("t".into()),
                role: Some(Role::Admin),
                name: Some("Admin Desa".into()),
            },
        );
        assert!(store.session.is_admin());
        clear_session(&mut store);
        assert!(!store.session.is_authenticated());
    }
}
