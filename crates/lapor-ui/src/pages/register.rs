use lapor_api_models::{RegisterRequest, ValidationErrors};
use lapor_client::ClientError;
use lapor_client::validation::validate_register;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

use crate::app::{Route, use_bundle, use_services};
use crate::components::fields::TextField;
use crate::core::store::{AppStore, ToastKind, push_error, push_toast};
use crate::core::view::field_error;

#[derive(Clone, Default, PartialEq, Eq)]
struct RegisterForm {
    name: String,
    email: String,
    password: String,
    password_confirmation: String,
}

impl RegisterForm {
    fn request(&self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            password_confirmation: self.password_confirmation.clone(),
        }
    }
}

#[function_component(RegisterPage)]
pub(crate) fn register_page() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let navigator = use_navigator();
    let form = use_state(RegisterForm::default);
    let errors = use_state(ValidationErrors::new);
    let busy = use_state(|| false);

    let onsubmit = {
        let form = form.clone();
        let errors = errors.clone();
        let busy = busy.clone();
        let auth = services.auth.clone();
        let success = t("auth.register_success", "Registrasi berhasil. Silakan login.");
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            let request = form.request();
            if let Err(found) = validate_register(&request) {
                errors.set(found);
                return;
            }
            errors.set(ValidationErrors::new());
            busy.set(true);

            let auth = auth.clone();
            let navigator = navigator.clone();
            let success = success.clone();
            let (errors, busy) = (errors.clone(), busy.clone());
            spawn_local(async move {
                let dispatch = Dispatch::<AppStore>::new();
                match auth.register(&request).await {
                    Ok(message) => {
                        dispatch.reduce_mut(|store| {
                            push_toast(store, ToastKind::Success, message.unwrap_or(success));
                        });
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Err(ClientError::Validation(found)) => {
                        errors.set(found);
                        busy.set(false);
                    }
                    Err(err) => {
                        dispatch.reduce_mut(|store| {
                            push_error(store, &err);
                        });
                        busy.set(false);
                    }
                }
            });
        })
    };

    let field = |apply: fn(&mut RegisterForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };

    html! {
        <section class="auth-page">
            <form class="card narrow stack" {onsubmit} novalidate={true}>
                <h2>{t("auth.register_title", "Daftar")}</h2>
                <TextField
                    label={t("auth.name", "Nama")}
                    name="name"
                    value={form.name.clone()}
                    on_input={field(|form, value| form.name = value)}
                    error={field_error(&errors, "name")}
                />
                <TextField
                    label={t("auth.email", "Email")}
                    name="email"
                    input_type="email"
                    value={form.email.clone()}
                    on_input={field(|form, value| form.email = value)}
                    error={field_error(&errors, "email")}
                />
                <TextField
                    label={t("auth.password", "Password")}
                    name="password"
                    input_type="password"
                    value={form.password.clone()}
                    on_input={field(|form, value| form.password = value)}
                    error={field_error(&errors, "password")}
                />
                <TextField
                    label={t("auth.password_confirmation", "Konfirmasi Password")}
                    name="password_confirmation"
                    input_type="password"
                    value={form.password_confirmation.clone()}
                    on_input={field(|form, value| form.password_confirmation = value)}
                    error={field_error(&errors, "password_confirmation")}
                />
                <button class="solid" type="submit" disabled={*busy}>
                    {t("auth.register", "Daftar")}
                </button>
                <p class="muted">
                    <Link<Route> to={Route::Login}>{t("auth.to_login", "Masuk")}</Link<Route>>
                </p>
            </form>
        </section>
    }
}
