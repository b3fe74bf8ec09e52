//! List view state: search, sort, pagination, lazy image resolution and delete.
//!
//! The presenter owns every image handle it resolves. Handles are cached per
//! report id, at most one live handle each, and only for rows on the active
//! page. Leaving the page, deleting the report or unmounting the view releases
//! them. Borrows of the internal cells are never held across an `.await`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use lapor_api_models::{Report, ReportId};
use tracing::warn;

use crate::error::ClientError;
use crate::images::{ObjectUrl, ProtectedImageLoader};
use crate::listing::{PAGE_SIZE, PageWindow, ReportStats, SortKey, SortState, filter_and_sort};
use crate::reports::ReportRepository;

/// Image state of one visible row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowImage {
    /// The report declares no photo.
    NoPhoto,
    /// Not resolved yet.
    Pending,
    /// Protected fetch succeeded; local handle.
    Ready(String),
    /// Protected fetch failed; public storage URL.
    Fallback(String),
    /// Both paths failed; render a placeholder.
    Unavailable,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// 1-based position across all pages.
    pub number: usize,
    /// Row data.
    pub report: Report,
    /// Image state.
    pub image: RowImage,
}

/// Everything a view needs to render the list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    /// Rows on the active page.
    pub rows: Vec<ReportRow>,
    /// Active page position.
    pub window: PageWindow,
    /// Current search text.
    pub query: String,
    /// Active sort.
    pub sort: SortState,
    /// Whether a list load is outstanding.
    pub loading: bool,
    /// Whether edit and delete controls are shown (presentation only).
    pub can_manage: bool,
}

/// Result of a delete request.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The user did not confirm; nothing was sent.
    Cancelled,
    /// Deleted and the list reloaded.
    Deleted,
    /// The server refused or the request failed; rows are unchanged.
    Failed(ClientError),
}

enum ImageSlot {
    Ready(ObjectUrl),
    Fallback(String),
    Unavailable,
}

struct CachedImage {
    foto: String,
    slot: ImageSlot,
}

struct ListState {
    reports: Vec<Report>,
    query: String,
    sort: SortState,
    page: usize,
    loading: bool,
    error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            reports: Vec::new(),
            query: String::new(),
            sort: SortState::default(),
            page: 1,
            loading: false,
            error: None,
        }
    }
}

/// Drives the report list view.
pub struct ReportListPresenter {
    repository: Rc<ReportRepository>,
    images: Rc<ProtectedImageLoader>,
    state: RefCell<ListState>,
    cache: RefCell<HashMap<ReportId, CachedImage>>,
    mounted: Cell<bool>,
    generation: Cell<u64>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl ReportListPresenter {
    /// Build a mounted presenter with an empty list.
    #[must_use]
    pub fn new(repository: Rc<ReportRepository>, images: Rc<ProtectedImageLoader>) -> Self {
        Self {
            repository,
            images,
            state: RefCell::new(ListState::default()),
            cache: RefCell::new(HashMap::new()),
            mounted: Cell::new(true),
            generation: Cell::new(0),
            listener: RefCell::new(None),
        }
    }

    /// Register the callback invoked after every state change.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Counter bumped whenever the visible row set changes. Views re-run
    /// image resolution when it moves.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Whether the owning view is still alive.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Fetch the full list. Failures and malformed bodies leave an empty list
    /// and an error message for [`Self::take_error`].
    pub async fn load(&self) {
        self.state.borrow_mut().loading = true;
        self.notify();

        let result = self.repository.list().await;
        if !self.mounted.get() {
            return;
        }
        let (reports, error) = match result {
            Ok(reports) => (reports, None),
            Err(err) => {
                warn!(error = %err, "report list load failed");
                (Vec::new(), Some(err.user_message()))
            }
        };

        let stale: Vec<CachedImage> = {
            let mut cache = self.cache.borrow_mut();
            let gone: Vec<ReportId> = cache
                .iter()
                .filter(|(id, cached)| {
                    !reports
                        .iter()
                        .any(|report| &report.id == *id && report.photo() == Some(cached.foto.as_str()))
                })
                .map(|(id, _)| id.clone())
                .collect();
            gone.iter().filter_map(|id| cache.remove(id)).collect()
        };
        drop(stale);

        {
            let mut state = self.state.borrow_mut();
            state.reports = reports;
            state.loading = false;
            state.error = error;
            let total = filter_and_sort(&state.reports, &state.query, state.sort).len();
            state.page = PageWindow::new(total, state.page, PAGE_SIZE).page;
        }
        self.invalidate();
        self.notify();
    }

    /// Resolve images for the visible rows, one at a time.
    ///
    /// Rows with a cached or failed entry are skipped. A protected-fetch
    /// failure caches the public storage URL instead. The loop stops as soon
    /// as the visible set changes or the view unmounts; a handle that arrives
    /// after that point is released immediately.
    pub async fn resolve_visible_images(&self) {
        let generation = self.generation.get();
        let pending: Vec<(ReportId, String)> = {
            let (rows, _) = self.visible();
            let cache = self.cache.borrow();
            rows.into_iter()
                .filter_map(|report| {
                    let foto = report.photo()?.to_string();
                    let cached = cache.get(&report.id).is_some_and(|entry| entry.foto == foto);
                    (!cached).then_some((report.id, foto))
                })
                .collect()
        };

        for (id, foto) in pending {
            if !self.is_current(generation) {
                break;
            }
            let result = self.images.load(&foto).await;
            if !self.is_current(generation) {
                drop(result);
                break;
            }
            let slot = match result {
                Ok(handle) => ImageSlot::Ready(handle),
                Err(err) => {
                    let fallback = self.images.public_url(&foto);
                    warn!(report = %id, error = %err, %fallback, "protected image failed; using public url");
                    ImageSlot::Fallback(fallback)
                }
            };
            let replaced = self.cache.borrow_mut().insert(id, CachedImage { foto, slot });
            drop(replaced);
            self.notify();
        }
    }

    /// The local handle for a row failed to display: release it and show the
    /// public storage URL instead. Rows in any other state are left alone.
    pub fn fall_back_to_public(&self, id: &ReportId) {
        let released = {
            let mut cache = self.cache.borrow_mut();
            match cache.get_mut(id) {
                Some(entry) if matches!(entry.slot, ImageSlot::Ready(_)) => {
                    let fallback = self.images.public_url(&entry.foto);
                    Some(std::mem::replace(&mut entry.slot, ImageSlot::Fallback(fallback)))
                }
                _ => None,
            }
        };
        if released.is_some() {
            drop(released);
            self.notify();
        }
    }

    /// Record that the rendered image for a row failed to display, releasing
    /// any handle held for it.
    pub fn mark_image_unavailable(&self, id: &ReportId) {
        let released = {
            let mut cache = self.cache.borrow_mut();
            cache
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.slot, ImageSlot::Unavailable))
        };
        if released.is_some() {
            drop(released);
            self.notify();
        }
    }

    /// Change the search text and return to page 1.
    pub fn set_query(&self, query: impl Into<String>) {
        {
            let mut state = self.state.borrow_mut();
            state.query = query.into();
            state.page = 1;
        }
        self.invalidate();
        self.notify();
    }

    /// Click a column header.
    pub fn toggle_sort(&self, key: SortKey) {
        {
            let mut state = self.state.borrow_mut();
            state.sort = state.sort.toggled(key);
        }
        self.invalidate();
        self.notify();
    }

    /// Jump to a page; out-of-range values clamp. Returns whether the active
    /// page moved.
    pub fn set_page(&self, page: usize) -> bool {
        let window = self.window_for(page);
        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.page != window.page;
            state.page = window.page;
            changed
        };
        if changed {
            self.invalidate();
            self.notify();
        }
        changed
    }

    /// First page.
    pub fn first_page(&self) -> bool {
        self.set_page(1)
    }

    /// Previous page.
    pub fn prev_page(&self) -> bool {
        let page = self.current_window().page;
        self.set_page(page.saturating_sub(1))
    }

    /// Next page.
    pub fn next_page(&self) -> bool {
        let page = self.current_window().page;
        self.set_page(page + 1)
    }

    /// Last page.
    pub fn last_page(&self) -> bool {
        let total_pages = self.current_window().total_pages;
        self.set_page(total_pages)
    }

    /// Delete after explicit confirmation, then reload.
    pub async fn delete(&self, id: &ReportId, confirmed: bool) -> DeleteOutcome {
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }
        match self.repository.delete(id).await {
            Ok(()) => {
                let removed = self.cache.borrow_mut().remove(id);
                drop(removed);
                self.load().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(report = %id, error = %err, "delete failed");
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// Take the pending load error, if any.
    pub fn take_error(&self) -> Option<String> {
        self.state.borrow_mut().error.take()
    }

    /// Status totals over the loaded set.
    #[must_use]
    pub fn stats(&self) -> ReportStats {
        ReportStats::from_reports(&self.state.borrow().reports)
    }

    /// Current render model.
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot {
        let (rows, window) = self.visible();
        let cache = self.cache.borrow();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, report)| {
                let image = match (report.photo(), cache.get(&report.id)) {
                    (None, _) => RowImage::NoPhoto,
                    (Some(foto), Some(entry)) if entry.foto == foto => match &entry.slot {
                        ImageSlot::Ready(handle) => RowImage::Ready(handle.url().to_string()),
                        ImageSlot::Fallback(url) => RowImage::Fallback(url.clone()),
                        ImageSlot::Unavailable => RowImage::Unavailable,
                    },
                    (Some(_), _) => RowImage::Pending,
                };
                ReportRow {
                    number: window.start + index + 1,
                    report,
                    image,
                }
            })
            .collect();
        let state = self.state.borrow();
        ListSnapshot {
            rows,
            window,
            query: state.query.clone(),
            sort: state.sort,
            loading: state.loading,
            can_manage: self.repository.session().is_admin(),
        }
    }

    /// Mark the view alive again after [`Self::unmount`].
    pub fn mount(&self) {
        self.mounted.set(true);
        self.invalidate();
    }

    /// Stop applying results and release every cached handle.
    pub fn unmount(&self) {
        self.mounted.set(false);
        self.invalidate();
        let released = std::mem::take(&mut *self.cache.borrow_mut());
        drop(released);
    }

    fn visible(&self) -> (Vec<Report>, PageWindow) {
        let state = self.state.borrow();
        let rows = filter_and_sort(&state.reports, &state.query, state.sort);
        let window = PageWindow::new(rows.len(), state.page, PAGE_SIZE);
        let page = rows[window.range()]
            .iter()
            .map(|report| (*report).clone())
            .collect();
        (page, window)
    }

    fn window_for(&self, page: usize) -> PageWindow {
        let state = self.state.borrow();
        let total = filter_and_sort(&state.reports, &state.query, state.sort).len();
        PageWindow::new(total, page, PAGE_SIZE)
    }

    fn current_window(&self) -> PageWindow {
        let page = self.state.borrow().page;
        self.window_for(page)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.mounted.get() && self.generation.get() == generation
    }

    fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.release_offscreen();
    }

    fn release_offscreen(&self) {
        let (rows, _) = self.visible();
        let released: Vec<CachedImage> = {
            let mut cache = self.cache.borrow_mut();
            let offscreen: Vec<ReportId> = cache
                .keys()
                .filter(|id| !rows.iter().any(|report| &report.id == *id))
                .cloned()
                .collect();
            offscreen.iter().filter_map(|id| cache.remove(id)).collect()
        };
        drop(released);
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::fetch::AuthenticatedFetch;
    use crate::session::{MemorySession, SessionProvider};
    use crate::testing::{
        CountingFactory, FakeTransport, admin_session, image_response, json_response,
        session_with_token,
    };
    use crate::transport::{HttpTransport, Method};
    use serde_json::{Value, json};

    struct Harness {
        transport: Rc<FakeTransport>,
        factory: Rc<CountingFactory>,
        presenter: Rc<ReportListPresenter>,
    }

    fn harness(session: MemorySession) -> Harness {
        let transport = Rc::new(FakeTransport::new());
        let factory = Rc::new(CountingFactory::default());
        let session: Rc<dyn SessionProvider> = Rc::new(session);
        let dyn_transport: Rc<dyn HttpTransport> = transport.clone();
        let config = ClientConfig::default();
        let fetch = Rc::new(AuthenticatedFetch::new(
            Rc::clone(&dyn_transport),
            Rc::clone(&session),
            config.clone(),
        ));
        let images = Rc::new(ProtectedImageLoader::new(
            dyn_transport,
            session,
            factory.clone(),
            config,
        ));
        let presenter = Rc::new(ReportListPresenter::new(
            Rc::new(ReportRepository::new(fetch)),
            images,
        ));
        Harness {
            transport,
            factory,
            presenter,
        }
    }

    fn reports_json(count: u32, with_photo: bool) -> Value {
        let rows: Vec<Value> = (1..=count)
            .map(|day| {
                json!({
                    "id": day,
                    "nama": format!("Pelapor {day}"),
                    "alamat": format!("Jl. Melati {day}"),
                    "deskripsi": "Jalan berlubang",
                    "tanggal": format!("2024-01-{day:02}"),
                    "status": "baru",
                    "foto": if with_photo { Value::from(format!("foto/{day}.jpg")) } else { Value::Null },
                })
            })
            .collect();
        Value::Array(rows)
    }

    #[tokio::test]
    async fn empty_envelope_renders_one_empty_page() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &json!({ "data": [] })));

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;

        let snapshot = h.presenter.snapshot();
        assert!(snapshot.rows.is_empty());
        assert_eq!((snapshot.window.page, snapshot.window.total_pages), (1, 1));
        assert_eq!(h.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn newest_ten_land_on_the_first_page() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(11, false)));

        h.presenter.load().await;
        let first = h.presenter.snapshot();
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.rows[0].report.id.as_str(), "11");
        assert_eq!(first.rows[9].report.id.as_str(), "2");
        assert!(first.rows.iter().all(|row| row.image == RowImage::NoPhoto));

        h.presenter.next_page();
        let second = h.presenter.snapshot();
        assert_eq!(second.window.page, 2);
        assert_eq!(second.rows.len(), 1);
        assert_eq!(second.rows[0].report.id.as_str(), "1");
        assert_eq!(second.rows[0].number, 11);

        h.presenter.next_page();
        assert_eq!(h.presenter.snapshot().window.page, 2);
        h.presenter.set_page(40);
        assert_eq!(h.presenter.snapshot().window.page, 2);
    }

    #[tokio::test]
    async fn search_resets_to_first_page() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(15, false)));
        h.presenter.load().await;
        h.presenter.last_page();
        assert_eq!(h.presenter.snapshot().window.page, 2);

        h.presenter.set_query("pelapor 1");
        let snapshot = h.presenter.snapshot();
        assert_eq!(snapshot.window.page, 1);
        // "Pelapor 1", "Pelapor 10".."Pelapor 15"
        assert_eq!(snapshot.window.total, 7);
    }

    #[tokio::test]
    async fn images_resolve_once_and_are_cached() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(2, true)));
        h.transport.respond(Method::Get, "/foto/1.jpg", image_response(200, b"one"));
        h.transport.respond(Method::Get, "/foto/2.jpg", image_response(200, b"two"));

        h.presenter.load().await;
        assert!(h
            .presenter
            .snapshot()
            .rows
            .iter()
            .all(|row| row.image == RowImage::Pending));
        h.presenter.resolve_visible_images().await;
        h.presenter.resolve_visible_images().await;

        assert_eq!(h.factory.created(), 2);
        assert_eq!(h.transport.count(Method::Get, "/foto/1.jpg"), 1);
        let rows = h.presenter.snapshot().rows;
        assert!(rows.iter().all(|row| matches!(row.image, RowImage::Ready(_))));
    }

    #[tokio::test]
    async fn forbidden_image_falls_back_then_placeholder() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(1, true)));
        h.transport.respond(Method::Get, "/foto/1.jpg", image_response(403, b""));

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        let row = h.presenter.snapshot().rows.remove(0);
        assert_eq!(
            row.image,
            RowImage::Fallback("http://127.0.0.1:8000/storage/foto/1.jpg".into())
        );

        h.presenter.resolve_visible_images().await;
        assert_eq!(h.transport.count(Method::Get, "/foto/1.jpg"), 1);

        h.presenter.mark_image_unavailable(&ReportId::from(1));
        assert_eq!(h.presenter.snapshot().rows[0].image, RowImage::Unavailable);
    }

    #[tokio::test]
    async fn broken_local_image_degrades_to_public_url() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(1, true)));
        h.transport.respond(Method::Get, "/foto/1.jpg", image_response(200, b"one"));
        let id = ReportId::from(1);

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        assert!(matches!(h.presenter.snapshot().rows[0].image, RowImage::Ready(_)));
        assert_eq!(h.factory.live().len(), 1);

        h.presenter.fall_back_to_public(&id);
        assert_eq!(
            h.presenter.snapshot().rows[0].image,
            RowImage::Fallback("http://127.0.0.1:8000/storage/foto/1.jpg".into())
        );
        assert!(h.factory.live().is_empty());

        h.presenter.fall_back_to_public(&id);
        assert!(matches!(h.presenter.snapshot().rows[0].image, RowImage::Fallback(_)));

        h.presenter.mark_image_unavailable(&id);
        assert_eq!(h.presenter.snapshot().rows[0].image, RowImage::Unavailable);
        h.presenter.resolve_visible_images().await;
        assert_eq!(h.transport.count(Method::Get, "/foto/1.jpg"), 1);
    }

    #[tokio::test]
    async fn changing_page_releases_offscreen_handles() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(15, true)));
        for day in 1..=15 {
            h.transport
                .respond(Method::Get, &format!("/foto/{day}.jpg"), image_response(200, b"img"));
        }

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        assert_eq!(h.factory.live().len(), 10);

        assert!(h.presenter.next_page());
        assert!(h.factory.live().is_empty());
        assert_eq!(h.factory.released().len(), 10);

        h.presenter.resolve_visible_images().await;
        let snapshot = h.presenter.snapshot();
        assert_eq!(snapshot.rows.len(), 5);
        assert_eq!(h.factory.live().len(), 5);
        let visible: Vec<String> = snapshot
            .rows
            .iter()
            .filter_map(|row| match &row.image {
                RowImage::Ready(url) => Some(url.clone()),
                _ => None,
            })
            .collect();
        let mut live = h.factory.live();
        live.sort();
        let mut expected = visible;
        expected.sort();
        assert_eq!(live, expected);
    }

    #[tokio::test]
    async fn staying_on_the_same_page_is_not_a_change() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(3, true)));
        for day in 1..=3 {
            h.transport
                .respond(Method::Get, &format!("/foto/{day}.jpg"), image_response(200, b"img"));
        }
        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        let generation = h.presenter.generation();

        assert!(!h.presenter.set_page(1));
        assert!(!h.presenter.first_page());
        assert!(!h.presenter.prev_page());
        assert!(!h.presenter.next_page());
        assert!(!h.presenter.last_page());
        assert_eq!(h.presenter.generation(), generation);
        assert_eq!(h.factory.live().len(), 3);
    }

    #[tokio::test]
    async fn malformed_list_degrades_to_empty_with_error() {
        let h = harness(session_with_token("t"));
        h.transport.respond_raw(Method::Get, "/laporan-online", 200, "not json");

        h.presenter.load().await;
        assert!(h.presenter.snapshot().rows.is_empty());
        assert!(h.presenter.take_error().is_some());
        assert!(h.presenter.take_error().is_none());
    }

    #[tokio::test]
    async fn delete_requires_confirmation_and_releases_handle() {
        let h = harness(admin_session());
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(2, true)));
        h.transport.respond(
            Method::Get,
            "/laporan-online",
            json_response(200, &reports_json(1, true)),
        );
        h.transport.respond(Method::Get, "/foto/1.jpg", image_response(200, b"one"));
        h.transport.respond(Method::Get, "/foto/2.jpg", image_response(200, b"two"));
        h.transport
            .respond(Method::Delete, "/laporan-online/2", json_response(200, &json!({ "message": "Dihapus" })));

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        assert!(h.presenter.snapshot().can_manage);
        assert_eq!(h.factory.live().len(), 2);

        let id = ReportId::from(2);
        assert!(matches!(h.presenter.delete(&id, false).await, DeleteOutcome::Cancelled));
        assert_eq!(h.transport.count(Method::Delete, "/laporan-online/2"), 0);

        assert!(matches!(h.presenter.delete(&id, true).await, DeleteOutcome::Deleted));
        assert_eq!(h.factory.live(), vec!["blob:test/2".to_string()]);
        let rows = h.presenter.snapshot().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].report.id.as_str(), "1");
    }

    #[tokio::test]
    async fn failed_delete_leaves_rows_intact() {
        let h = harness(admin_session());
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(3, false)));
        h.presenter.load().await;

        let outcome = h.presenter.delete(&ReportId::from(42), true).await;
        assert!(matches!(outcome, DeleteOutcome::Failed(ref err) if err.status() == Some(404)));
        let again = h.presenter.delete(&ReportId::from(42), true).await;
        assert!(matches!(again, DeleteOutcome::Failed(_)));
        assert_eq!(h.presenter.snapshot().rows.len(), 3);
    }

    #[tokio::test]
    async fn regular_users_cannot_manage() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(1, false)));
        h.presenter.load().await;
        assert!(!h.presenter.snapshot().can_manage);
    }

    #[tokio::test]
    async fn unmount_releases_every_handle() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(3, true)));
        for day in 1..=3 {
            h.transport
                .respond(Method::Get, &format!("/foto/{day}.jpg"), image_response(200, b"img"));
        }

        h.presenter.load().await;
        h.presenter.resolve_visible_images().await;
        assert_eq!(h.factory.live().len(), 3);

        h.presenter.unmount();
        assert!(h.factory.live().is_empty());
        assert_eq!(h.factory.released().len(), 3);
    }

    #[tokio::test]
    async fn unmount_mid_resolution_stops_and_releases() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(3, true)));
        for day in 1..=3 {
            h.transport
                .respond(Method::Get, &format!("/foto/{day}.jpg"), image_response(200, b"img"));
        }
        h.presenter.load().await;

        let weak = Rc::downgrade(&h.presenter);
        h.transport.on_send(move |request| {
            if request.url.contains("/foto/") {
                if let Some(presenter) = weak.upgrade() {
                    presenter.unmount();
                }
            }
        });
        h.presenter.resolve_visible_images().await;

        let image_requests = h
            .transport
            .requests()
            .iter()
            .filter(|request| request.url.contains("/foto/"))
            .count();
        assert_eq!(image_requests, 1);
        assert_eq!(h.factory.created(), 1);
        assert!(h.factory.live().is_empty());
    }

    #[tokio::test]
    async fn listener_fires_on_changes() {
        let h = harness(session_with_token("t"));
        h.transport
            .respond(Method::Get, "/laporan-online", json_response(200, &reports_json(1, false)));
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        h.presenter.subscribe(move || counter.set(counter.get() + 1));

        h.presenter.load().await;
        assert_eq!(hits.get(), 2);
        h.presenter.toggle_sort(SortKey::Nama);
        assert_eq!(hits.get(), 3);
        assert_eq!(h.presenter.stats().baru, 1);
    }
}
