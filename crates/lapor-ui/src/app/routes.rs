//! Routing definitions for the LaporOnline UI.
use yew_router::prelude::*;

use crate::core::nav::Page;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/laporan")]
    Reports,
    #[at("/tambah")]
    AddReport,
    #[at("/edit/:id")]
    EditReport { id: String },
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<&Route> for Page {
    fn from(route: &Route) -> Self {
        match route {
            Route::Home => Self::Home,
            Route::Reports => Self::Reports,
            Route::AddReport => Self::AddReport,
            Route::EditReport { id } => Self::EditReport { id: id.clone() },
            Route::Login => Self::Login,
            Route::Register => Self::Register,
            Route::NotFound => Self::NotFound,
        }
    }
}

impl From<Page> for Route {
    fn from(page: Page) -> Self {
        match page {
            Page::Home => Self::Home,
            Page::Reports => Self::Reports,
            Page::AddReport => Self::AddReport,
            Page::EditReport { id } => Self::EditReport { id },
            Page::Login => Self::Login,
            Page::Register => Self::Register,
            Page::NotFound => Self::NotFound,
        }
    }
}
