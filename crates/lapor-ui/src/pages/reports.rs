use std::rc::Rc;

use lapor_api_models::Report;
use lapor_client::display::{DESCRIPTION_PREVIEW_CHARS, format_date, truncate};
use lapor_client::{DeleteOutcome, ReportListPresenter, ReportRow, RowImage, SortKey};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

use crate::app::{Route, use_bundle, use_services};
use crate::components::modal::{ConfirmDialog, Modal};
use crate::components::pager::Pager;
use crate::core::store::{AppStore, ToastKind, push_toast};
use crate::core::view::{sort_indicator, status_class, status_key};
use crate::i18n::TranslationBundle;

const COLUMNS: [(SortKey, &str); 5] = [
    (SortKey::Nama, "list.col_nama"),
    (SortKey::Alamat, "list.col_alamat"),
    (SortKey::Deskripsi, "list.col_deskripsi"),
    (SortKey::Tanggal, "list.col_tanggal"),
    (SortKey::Status, "list.col_status"),
];

/// Image opened in the preview modal: `(title, url)`.
type Preview = (String, String);

fn resolve_images(presenter: &Rc<ReportListPresenter>) {
    let presenter = Rc::clone(presenter);
    spawn_local(async move { presenter.resolve_visible_images().await });
}

fn report_load_error(presenter: &ReportListPresenter) {
    if let Some(message) = presenter.take_error() {
        Dispatch::<AppStore>::new().reduce_mut(|store| {
            push_toast(store, ToastKind::Error, message);
        });
    }
}

#[function_component(ReportsPage)]
pub(crate) fn reports_page() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let presenter = {
        let repository = services.repository.clone();
        let images = services.images.clone();
        use_memo(move |_| ReportListPresenter::new(repository, images), ())
    };
    let force_update = use_force_update();
    let pending_delete = use_state(|| None::<Report>);
    let deleting = use_state(|| false);
    let description = use_state(|| None::<Report>);
    let preview = use_state(|| None::<Preview>);

    {
        let presenter = presenter.clone();
        use_effect_with_deps(
            move |_| {
                presenter.mount();
                presenter.subscribe(move || force_update.force_update());
                {
                    let presenter = presenter.clone();
                    spawn_local(async move {
                        presenter.load().await;
                        report_load_error(&presenter);
                        presenter.resolve_visible_images().await;
                    });
                }
                move || presenter.unmount()
            },
            (),
        );
    }

    let snapshot = presenter.snapshot();

    let on_search = {
        let presenter = presenter.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                presenter.set_query(input.value());
                resolve_images(&presenter);
            }
        })
    };
    let paging = |step: fn(&ReportListPresenter) -> bool| {
        let presenter = presenter.clone();
        Callback::from(move |()| {
            if step(&presenter) {
                resolve_images(&presenter);
            }
        })
    };

    let on_confirm_delete = {
        let presenter = presenter.clone();
        let pending_delete = pending_delete.clone();
        let deleting = deleting.clone();
        let deleted = t("list.deleted", "Laporan dihapus.");
        let failed = t("list.delete_failed", "Gagal menghapus laporan.");
        Callback::from(move |()| {
            let Some(report) = (*pending_delete).clone() else {
                return;
            };
            deleting.set(true);
            let presenter = presenter.clone();
            let (pending_delete, deleting) = (pending_delete.clone(), deleting.clone());
            let (deleted, failed) = (deleted.clone(), failed.clone());
            spawn_local(async move {
                let outcome = presenter.delete(&report.id, true).await;
                let dispatch = Dispatch::<AppStore>::new();
                match outcome {
                    DeleteOutcome::Deleted => dispatch.reduce_mut(|store| {
                        push_toast(store, ToastKind::Success, deleted);
                    }),
                    DeleteOutcome::Failed(err) => dispatch.reduce_mut(|store| {
                        push_toast(store, ToastKind::Error, format!("{failed} {}", err.user_message()));
                    }),
                    DeleteOutcome::Cancelled => {}
                }
                report_load_error(&presenter);
                deleting.set(false);
                pending_delete.set(None);
                presenter.resolve_visible_images().await;
            });
        })
    };
    let on_cancel_delete = {
        let pending_delete = pending_delete.clone();
        Callback::from(move |()| pending_delete.set(None))
    };

    let handlers = RowHandlers {
        presenter: presenter.clone(),
        pending_delete: pending_delete.clone(),
        description: description.clone(),
        preview: preview.clone(),
    };

    let header = COLUMNS.iter().map(|(key, label)| {
        let presenter = presenter.clone();
        let key = *key;
        let onclick = Callback::from(move |_: MouseEvent| {
            presenter.toggle_sort(key);
            resolve_images(&presenter);
        });
        html! {
            <th class="sortable" {onclick}>
                {t(label, "")}{" "}{sort_indicator(snapshot.sort, key)}
            </th>
        }
    });

    let body = if snapshot.loading && snapshot.rows.is_empty() {
        html! { <tr><td colspan="9" class="muted">{t("list.loading", "Memuat…")}</td></tr> }
    } else if snapshot.window.total == 0 {
        html! { <tr><td colspan="9" class="muted">{t("list.empty", "Belum ada laporan.")}</td></tr> }
    } else {
        snapshot
            .rows
            .iter()
            .map(|row| render_row(row, snapshot.can_manage, &bundle, &handlers))
            .collect::<Html>()
    };

    html! {
        <section class="reports">
            <div class="toolbar">
                <h2>{t("list.title", "Data Laporan")}</h2>
                <input
                    class="search"
                    type="search"
                    placeholder={t("list.search", "Cari laporan…")}
                    value={snapshot.query.clone()}
                    oninput={on_search}
                />
                <Link<Route> to={Route::AddReport} classes={classes!("solid")}>
                    {t("nav.add", "Tambah Laporan")}
                </Link<Route>>
            </div>
            <div class="card table-wrap">
                <table class="report-table">
                    <thead>
                        <tr>
                            <th>{t("list.col_no", "No")}</th>
                            {for header}
                            <th>{t("list.col_foto", "Foto")}</th>
                            <th>{t("list.col_aksi", "Aksi")}</th>
                        </tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
            <Pager
                window={snapshot.window}
                on_first={paging(ReportListPresenter::first_page)}
                on_prev={paging(ReportListPresenter::prev_page)}
                on_next={paging(ReportListPresenter::next_page)}
                on_last={paging(ReportListPresenter::last_page)}
            />
            {(*description).as_ref().map_or_else(|| html! {}, |report| {
                let description = description.clone();
                html! {
                    <Modal title={report.nama.clone()} on_close={Callback::from(move |()| description.set(None))}>
                        <p class="muted">{format!("{} · {}", report.alamat, format_date(report.tanggal))}</p>
                        <p class="description">{report.description().to_string()}</p>
                    </Modal>
                }
            })}
            {(*preview).as_ref().map_or_else(|| html! {}, |(title, url)| {
                let preview = preview.clone();
                html! {
                    <Modal title={title.clone()} wide={true} on_close={Callback::from(move |()| preview.set(None))}>
                        <img class="photo-full" src={url.clone()} alt={title.clone()} />
                    </Modal>
                }
            })}
            {(*pending_delete).as_ref().map_or_else(|| html! {}, |report| html! {
                <ConfirmDialog
                    title={t("list.delete", "Hapus")}
                    message={format!("{} ({})", t("list.confirm_delete", "Hapus laporan ini?"), report.nama)}
                    busy={*deleting}
                    on_confirm={on_confirm_delete.clone()}
                    on_cancel={on_cancel_delete.clone()}
                />
            })}
        </section>
    }
}

struct RowHandlers {
    presenter: Rc<ReportListPresenter>,
    pending_delete: UseStateHandle<Option<Report>>,
    description: UseStateHandle<Option<Report>>,
    preview: UseStateHandle<Option<Preview>>,
}

fn render_row(
    row: &ReportRow,
    can_manage: bool,
    bundle: &TranslationBundle,
    handlers: &RowHandlers,
) -> Html {
    let t = |key: &str, default: &str| bundle.text(key, default);
    let report = &row.report;
    let (excerpt, truncated) = truncate(report.description(), DESCRIPTION_PREVIEW_CHARS);
    let read_more = if truncated {
        let description = handlers.description.clone();
        let report = report.clone();
        html! {
            <button class="link" onclick={Callback::from(move |_: MouseEvent| description.set(Some(report.clone())))}>
                {t("list.read_more", "Selengkapnya")}
            </button>
        }
    } else {
        html! {}
    };

    let photo = match &row.image {
        RowImage::NoPhoto => html! { <span class="muted">{t("list.no_photo", "Tidak ada foto")}</span> },
        RowImage::Pending => html! { <span class="muted">{t("list.loading", "Memuat…")}</span> },
        RowImage::Unavailable => {
            html! { <span class="muted">{t("list.photo_unavailable", "Foto tidak tersedia")}</span> }
        }
        RowImage::Ready(url) | RowImage::Fallback(url) => {
            let onerror = {
                let presenter = handlers.presenter.clone();
                let id = report.id.clone();
                let local = matches!(row.image, RowImage::Ready(_));
                Callback::from(move |_: Event| {
                    if local {
                        presenter.fall_back_to_public(&id);
                    } else {
                        presenter.mark_image_unavailable(&id);
                    }
                })
            };
            let onclick = {
                let preview = handlers.preview.clone();
                let opened = (report.nama.clone(), url.clone());
                Callback::from(move |_: MouseEvent| preview.set(Some(opened.clone())))
            };
            html! {
                <img class="thumb" src={url.clone()} alt={report.nama.clone()} title={t("list.view", "Lihat")} {onerror} {onclick} />
            }
        }
    };

    let actions = if can_manage {
        let pending_delete = handlers.pending_delete.clone();
        let target = report.clone();
        html! {
            <div class="row-actions">
                <Link<Route> to={Route::EditReport { id: report.id.as_str().to_string() }} classes={classes!("ghost")}>
                    {t("list.edit", "Edit")}
                </Link<Route>>
                <button class="danger" onclick={Callback::from(move |_: MouseEvent| pending_delete.set(Some(target.clone())))}>
                    {t("list.delete", "Hapus")}
                </button>
            </div>
        }
    } else {
        html! { <span class="muted">{"-"}</span> }
    };

    html! {
        <tr key={report.id.as_str().to_string()}>
            <td>{row.number.to_string()}</td>
            <td>{report.nama.clone()}</td>
            <td>{report.alamat.clone()}</td>
            <td>{if excerpt.is_empty() { "-".to_string() } else { excerpt }}{" "}{read_more}</td>
            <td>{format_date(report.tanggal)}</td>
            <td>
                <span class={classes!("badge", status_class(report.status))}>
                    {t(status_key(report.status), report.status.as_str())}
                </span>
            </td>
            <td>{photo}</td>
            <td>{actions}</td>
        </tr>
    }
}
