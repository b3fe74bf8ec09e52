//! Form inputs shared by the report and account pages.

use gloo::file::File;
use gloo::file::futures::read_as_bytes;
use lapor_client::PhotoUpload;
use lapor_client::validation::validate_photo;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct TextFieldProps {
    pub label: String,
    pub name: &'static str,
    pub value: String,
    pub on_input: Callback<String>,
    #[prop_or("text")]
    pub input_type: &'static str,
    #[prop_or_default]
    pub multiline: bool,
    #[prop_or_default]
    pub error: Option<String>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(TextField)]
pub(crate) fn text_field(props: &TextFieldProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                on_input.emit(input.value());
            } else if let Some(area) = event.target_dyn_into::<HtmlTextAreaElement>() {
                on_input.emit(area.value());
            }
        })
    };
    let invalid = props.error.is_some();
    let control = if props.multiline {
        html! {
            <textarea
                id={props.name}
                name={props.name}
                rows="4"
                value={props.value.clone()}
                class={classes!(invalid.then_some("invalid"))}
                disabled={props.disabled}
                {oninput}
            />
        }
    } else {
        html! {
            <input
                id={props.name}
                name={props.name}
                type={props.input_type}
                value={props.value.clone()}
                class={classes!(invalid.then_some("invalid"))}
                disabled={props.disabled}
                {oninput}
            />
        }
    };

    html! {
        <label class="field" for={props.name}>
            <span>{props.label.clone()}</span>
            {control}
            {field_message(props.error.as_deref())}
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SelectFieldProps {
    pub label: String,
    pub name: &'static str,
    pub value: String,
    /// `(value, label)` pairs.
    pub options: Vec<(String, String)>,
    pub placeholder: String,
    pub on_change: Callback<String>,
    #[prop_or_default]
    pub error: Option<String>,
}

#[function_component(SelectField)]
pub(crate) fn select_field(props: &SelectFieldProps) -> Html {
    let onchange = {
        let on_change = props.on_change.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                on_change.emit(select.value());
            }
        })
    };

    html! {
        <label class="field" for={props.name}>
            <span>{props.label.clone()}</span>
            <select id={props.name} name={props.name} {onchange}>
                <option value="" selected={props.value.is_empty()} disabled={true}>
                    {props.placeholder.clone()}
                </option>
                {for props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={*value == props.value}>{label.clone()}</option>
                })}
            </select>
            {field_message(props.error.as_deref())}
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PhotoFieldProps {
    pub label: String,
    /// Receives the read file, or the reason it was refused.
    pub on_select: Callback<Result<PhotoUpload, String>>,
    #[prop_or_default]
    pub preview: Option<String>,
    #[prop_or_default]
    pub error: Option<String>,
}

/// File picker that checks type and size before reading the file.
#[function_component(PhotoField)]
pub(crate) fn photo_field(props: &PhotoFieldProps) -> Html {
    let onchange = {
        let on_select = props.on_select.clone();
        Callback::from(move |event: Event| {
            let Some(input) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let file = File::from(file);
            let content_type = file.raw_mime_type();
            let size = usize::try_from(file.size()).unwrap_or(usize::MAX);
            if let Err(reason) = validate_photo(&content_type, size) {
                input.set_value("");
                on_select.emit(Err(reason.to_string()));
                return;
            }
            let on_select = on_select.clone();
            spawn_local(async move {
                match read_as_bytes(&file).await {
                    Ok(bytes) => on_select.emit(Ok(PhotoUpload {
                        filename: file.name(),
                        content_type,
                        bytes,
                    })),
                    Err(err) => on_select.emit(Err(err.to_string())),
                }
            });
        })
    };

    html! {
        <label class="field" for="foto">
            <span>{props.label.clone()}</span>
            <input id="foto" name="foto" type="file" accept="image/jpeg,image/png,image/jpg" {onchange} />
            {props.preview.as_ref().map_or_else(|| html! {}, |url| html! {
                <img class="photo-preview" src={url.clone()} alt={props.label.clone()} />
            })}
            {field_message(props.error.as_deref())}
        </label>
    }
}

fn field_message(error: Option<&str>) -> Html {
    error.map_or_else(
        || html! {},
        |message| html! { <small class="error-text">{message.to_string()}</small> },
    )
}
