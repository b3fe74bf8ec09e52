#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::future_not_send)]
//! Authenticated data access and list presentation for the LaporOnline front ends.
//!
//! The crate is transport-agnostic: browser and CLI consumers plug in an
//! [`HttpTransport`], a [`SessionProvider`] and an [`ImageHandleFactory`], and
//! reuse the same fetch wrapper, repository, auth flow and list presenter.
//! Everything here is single-threaded (`Rc`/`RefCell`), matching the browser
//! event loop it was built for.

pub mod auth;
pub mod config;
pub mod display;
pub mod error;
pub mod fetch;
pub mod images;
pub mod listing;
pub mod presenter;
pub mod reports;
pub mod session;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{Access, AuthService, GuardOutcome, guard};
pub use config::ClientConfig;
pub use error::ClientError;
pub use fetch::{AuthenticatedFetch, JsonResponse};
pub use images::{ImageHandleFactory, ObjectUrl, ProtectedImageLoader, bare_filename};
pub use listing::{PAGE_SIZE, PageWindow, ReportStats, SortDirection, SortKey, SortState};
pub use presenter::{DeleteOutcome, ListSnapshot, ReportListPresenter, ReportRow, RowImage};
pub use reports::{ReportRepository, SavedReport};
pub use session::{MemorySession, Session, SessionProvider};
pub use transport::{
    CredentialsMode, FilePart, FormValue, HttpRequest, HttpResponse, HttpTransport, Method,
    MultipartForm, RequestBody,
};
pub use validation::{PhotoUpload, ReportDraft};
