use std::rc::Rc;

use lapor_api_models::ValidationErrors;
use lapor_client::{ClientError, ObjectUrl, PhotoUpload, ReportDraft};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

use crate::app::{Route, Services, use_bundle, use_services};
use crate::components::fields::PhotoField;
use crate::components::report_form::ReportFields;
use crate::core::store::{AppStore, ToastKind, push_error, push_toast};
use crate::core::view::field_error;

/// Selected photo plus the local preview handle, released on drop.
#[derive(Clone)]
pub(crate) struct SelectedPhoto {
    pub(crate) upload: PhotoUpload,
    pub(crate) preview: Option<Rc<ObjectUrl>>,
}

impl SelectedPhoto {
    pub(crate) fn new(services: &Services, upload: PhotoUpload) -> Self {
        let preview = services
            .image_factory
            .create(&upload.bytes, Some(&upload.content_type))
            .ok()
            .map(|url| Rc::new(ObjectUrl::new(url, Rc::clone(&services.image_factory))));
        Self { upload, preview }
    }

    pub(crate) fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().map(|handle| handle.url().to_string())
    }
}

/// Applies a photo picker result to the page state.
pub(crate) fn photo_selected(
    services: &Services,
    photo: &UseStateHandle<Option<SelectedPhoto>>,
    errors: &UseStateHandle<ValidationErrors>,
) -> Callback<Result<PhotoUpload, String>> {
    let services = services.clone();
    let photo = photo.clone();
    let errors = errors.clone();
    Callback::from(move |selected: Result<PhotoUpload, String>| {
        let mut next_errors = (*errors).clone();
        next_errors.clear_field("foto");
        match selected {
            Ok(upload) => photo.set(Some(SelectedPhoto::new(&services, upload))),
            Err(reason) => {
                photo.set(None);
                next_errors.add("foto", reason);
            }
        }
        errors.set(next_errors);
    })
}

#[function_component(AddReportPage)]
pub(crate) fn add_report_page() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let navigator = use_navigator();
    let draft = use_state(ReportDraft::default);
    let photo = use_state(|| None::<SelectedPhoto>);
    let errors = use_state(ValidationErrors::new);
    let saving = use_state(|| false);

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
        let success = t("add.success", "Laporan berhasil dikirim.");
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *saving {
                return;
            }
            let mut submission = (*draft).clone();
            submission.foto = (*photo).as_ref().map(|selected| selected.upload.clone());
            if let Err(found) = submission.validate_create() {
                errors.set(found);
                return;
            }
            errors.set(ValidationErrors::new());
            saving.set(true);

            let repository = repository.clone();
            let navigator = navigator.clone();
            let success = success.clone();
            let (errors, saving) = (errors.clone(), saving.clone());
            spawn_local(async move {
                let dispatch = Dispatch::<AppStore>::new();
                match repository.create(submission.into_create_form()).await {
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

    html! {
        <section class="report-form">
            <form class="card stack" {onsubmit} novalidate={true}>
                <h2>{t("add.title", "Tambah Laporan")}</h2>
                <ReportFields draft={(*draft).clone()} errors={(*errors).clone()} {on_change} />
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
                        {if *saving { t("form.saving", "Menyimpan…") } else { t("form.submit", "Kirim") }}
                    </button>
                </div>
            </form>
        </section>
    }
}
