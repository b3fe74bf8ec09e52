use lapor_api_models::{ReportStatus, ValidationErrors};
use lapor_client::ReportDraft;
use yew::prelude::*;

use crate::app::use_bundle;
use crate::components::fields::{SelectField, TextField};
use crate::core::view::{field_error, status_key};

#[derive(Properties, PartialEq)]
pub(crate) struct ReportFieldsProps {
    pub draft: ReportDraft,
    pub errors: ValidationErrors,
    pub on_change: Callback<ReportDraft>,
    /// Edit forms expose the status; new reports are always `baru`.
    #[prop_or_default]
    pub with_status: bool,
}

/// Text fields of the report forms. The photo is handled by the page.
#[function_component(ReportFields)]
pub(crate) fn report_fields(props: &ReportFieldsProps) -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let field = |apply: fn(&mut ReportDraft, String)| {
        let draft = props.draft.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |value: String| {
            let mut next = draft.clone();
            apply(&mut next, value);
            on_change.emit(next);
        })
    };
    let errors = &props.errors;
    let draft = &props.draft;

    let status = if props.with_status {
        let options = ReportStatus::all()
            .into_iter()
            .map(|status| (status.as_str().to_string(), t(status_key(status), status.as_str())))
            .collect::<Vec<_>>();
        html! {
            <SelectField
                label={t("form.status", "Status")}
                name="status"
                value={draft.status.map(|status| status.as_str().to_string()).unwrap_or_default()}
                {options}
                placeholder={t("status.choose", "Pilih status")}
                on_change={field(|draft, value| draft.status = ReportStatus::parse(&value))}
                error={field_error(errors, "status")}
            />
        }
    } else {
        html! {}
    };

    html! {
        <>
            <TextField
                label={t("form.nama", "Nama")}
                name="nama"
                value={draft.nama.clone()}
                on_input={field(|draft, value| draft.nama = value)}
                error={field_error(errors, "nama")}
            />
            <TextField
                label={t("form.alamat", "Alamat")}
                name="alamat"
                value={draft.alamat.clone()}
                on_input={field(|draft, value| draft.alamat = value)}
                error={field_error(errors, "alamat")}
            />
            <TextField
                label={t("form.deskripsi", "Deskripsi")}
                name="deskripsi"
                multiline={true}
                value={draft.deskripsi.clone()}
                on_input={field(|draft, value| draft.deskripsi = value)}
                error={field_error(errors, "deskripsi")}
            />
            <TextField
                label={t("form.tanggal", "Tanggal")}
                name="tanggal"
                input_type="date"
                value={draft.tanggal.clone()}
                on_input={field(|draft, value| draft.tanggal = value)}
                error={field_error(errors, "tanggal")}
            />
            {status}
        </>
    }
}
