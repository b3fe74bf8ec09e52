//! Page identities, their paths and the access rule each one carries.

use lapor_client::{Access, GuardOutcome, Session, guard};

/// Navigable pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    /// Landing page with status totals.
    Home,
    /// Report table.
    Reports,
    /// Submission form.
    AddReport,
    /// Edit form for one report.
    EditReport {
        /// Report identifier from the path.
        id: String,
    },
    /// Sign-in form.
    Login,
    /// Account creation form.
    Register,
    /// Unknown path.
    NotFound,
}

impl Page {
    /// Who may see the page.
    #[must_use]
    pub const fn access(&self) -> Access {
        match self {
            Self::Home | Self::Reports | Self::AddReport | Self::EditReport { .. } => {
                Access::Protected
            }
            Self::Login | Self::Register => Access::GuestOnly,
            Self::NotFound => Access::Public,
        }
    }

    /// Browser path of the page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Reports => "/laporan".to_string(),
            Self::AddReport => "/tambah".to_string(),
            Self::EditReport { id } => format!("/edit/{id}"),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the navbar entry for `self` should be highlighted on `current`.
    #[must_use]
    pub fn is_active(&self, current: &Self) -> bool {
        self == current
    }
}

/// Where to send the browser instead of rendering `page`, if anywhere.
#[must_use]
pub fn redirect_for(page: &Page, session: &Session) -> Option<Page> {
    match guard(page.access(), session) {
        GuardOutcome::Allow => None,
        GuardOutcome::RedirectToLogin => Some(Page::Login),
        GuardOutcome::RedirectToHome => Some(Page::Home),
    }
}

/// Navbar entries, in display order, with their translation keys.
#[must_use]
pub fn nav_items() -> [(Page, &'static str); 3] {
    [
        (Page::Home, "nav.home"),
        (Page::Reports, "nav.reports"),
        (Page::AddReport, "nav.add"),
    ]
}
