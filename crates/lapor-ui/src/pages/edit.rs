use std::cell::Cell;
use std::rc::Rc;

use gloo::console;
use lapor_api_models::{Report, ReportId, ValidationErrors};
use lapor_client::{ClientError, ReportDraft};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

use crate::app::{Route, use_bundle, use_services};
use crate::components::fields::PhotoField;
use crate::components::protected_image::ProtectedImage;
use crate::components::report_form::ReportFields;
use crate::core::store::{AppStore, ToastKind, push_error, push_toast};
use crate::core::view::field_error;
use crate::pages::add::{SelectedPhoto, photo_selected};

#[derive(Properties, PartialEq)]
pub(crate) struct EditReportProps {
    pub id: String,
}

#[function_component(EditReportPage)]
pub(crate) fn edit_report_page(props: &EditReportProps) -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let navigator = use_navigator();
    let report = use_state(|| None::<Report>);
    let load_failed = use_state(|| false);
    let draft = use_state(ReportDraft::default);
    let photo = use_state(|| None::<SelectedPhoto>);
    let errors = use_state(ValidationErrors::new);
    let saving = use_state(|| false);

    {
        let report = report.clone();
        let load_failed = load_failed.clone();
        let draft = draft.clone();
        let repository = services.repository.clone();
        use_effect_with_deps(
            move |id: &String| {
                let active = Rc::new(Cell::new(true));
                let id = ReportId::new(id.clone());
                {
                    let active = active.clone();
                    spawn_local(async move {
                        let result = repository.get(&id).await;
                        if !active.get() {
                            return;
                        }
                        match result {
                            Ok(found) => {
                                draft.set(ReportDraft::from_report(&found));
                                report.set(Some(found));
                            }
                            Err(err) => {
                                console::error!("failed to load report", id.as_str(), err.to_string());
                                Dispatch::<AppStore>::new().reduce_mut(|store| {
                                    push_error(store, &err);
                                });
                                load_failed.set(true);
                            }
                        }
                    });
                }
                move || active.set(false)
            },
            props.id.clone(),
        );
    }

    let on_change = {
        let draft = draft.clone();
        Callback::from(move |next: ReportDraft| draft.set(next))
    };
    let on_photo = photo_selected(&services, &photo, &errors);

    let onsubmit = {
        let draft = draft.clone();
        let photo = photo.clone();
        let errors = errors.clone();
        let saving = saving.clone();
        let repository = services.repository.clone();
        let id = ReportId::new(props.id.clone());
        let success = t("edit.success", "Laporan berhasil diperbarui.");
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *saving {
                return;
            }
            let mut submission = (*draft).clone();
            submission.foto = (*photo).as_ref().map(|selected| selected.upload.clone());
            if let Err(found) = submission.validate_edit() {
                errors.set(found);
                return;
            }
            errors.set(ValidationErrors::new());
            saving.set(true);

            let repository = repository.clone();
            let navigator = navigator.clone();
            let id = id.clone();
            let success = success.clone();
            let (errors, saving) = (errors.clone(), saving.clone());
            spawn_local(async move {
                let dispatch = Dispatch::<AppStore>::new();
                match repository.update(&id, submission.into_update_form()).await {
                    Ok(saved) => {
                        dispatch.reduce_mut(|store| {
                            push_toast(store, ToastKind::Success, saved.message.unwrap_or(success));
                        });
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Reports);
                        }
                    }
                    Err(ClientError::Validation(found)) => {
                        errors.set(found);
                        saving.set(false);
                    }
                    Err(err) => {
                        dispatch.reduce_mut(|store| {
                            push_error(store, &err);
                        });
                        saving.set(false);
                    }
                }
            });
        })
    };

    let Some(current) = (*report).as_ref() else {
        return if *load_failed {
            html! {
                <section class="card narrow">
                    <p class="error-text">{t("edit.load_failed", "Laporan tidak dapat dimuat.")}</p>
                    <Link<Route> to={Route::Reports} classes={classes!("ghost")}>
                        {t("not_found.back", "Kembali")}
                    </Link<Route>>
                </section>
            }
        } else {
            html! { <section class="card narrow"><p class="muted">{t("list.loading", "Memuat…")}</p></section> }
        };
    };

    let current_photo = current.photo().map_or_else(
        || html! { <span class="muted">{t("list.no_photo", "Tidak ada foto")}</span> },
        |foto| html! { <ProtectedImage foto={foto.to_string()} alt={current.nama.clone()} class={classes!("photo-preview")} /> },
    );

    html! {
        <section class="report-form">
            <form class="card stack" {onsubmit} novalidate={true}>
                <h2>{t("edit.title", "Edit Laporan")}</h2>
                <ReportFields draft={(*draft).clone()} errors={(*errors).clone()} {on_change} with_status={true} />
                <div class="field">
                    <span>{t("edit.current_photo", "Foto saat ini")}</span>
                    {current_photo}
                </div>
                <PhotoField
                    label={t("form.foto", "Foto")}
                    on_select={on_photo}
                    preview={(*photo).as_ref().and_then(SelectedPhoto::preview_url)}
                    error={field_error(&errors, "foto")}
                />
                <div class="actions">
                    <Link<Route> to={Route::Reports} classes={classes!("ghost")}>
                        {t("form.cancel", "Batal")}
                    </Link<Route>>
                    <button class="solid" type="submit" disabled={*saving}>
                        {if *saving { t("form.saving", "Menyimpan…") } else { t("form.save", "Simpan") }}
                    </button>
                </div>
            </form>
        </section>
    }
}
