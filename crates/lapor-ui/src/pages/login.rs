use lapor_api_models::ValidationErrors;
use lapor_client::ClientError;
use lapor_client::validation::validate_login;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::Dispatch;

use crate::app::{Route, use_bundle, use_services};
use crate::components::fields::TextField;
use crate::core::store::{AppStore, set_session};
use crate::core::view::field_error;

#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let navigator = use_navigator();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let errors = use_state(ValidationErrors::new);
    let failure = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let onsubmit = {
        let email = email.clone();
        let password = password.clone();
        let errors = errors.clone();
        let failure = failure.clone();
        let busy = busy.clone();
        let auth = services.auth.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy {
                return;
            }
            if let Err(found) = validate_login(&email, &password) {
                errors.set(found);
                return;
            }
            errors.set(ValidationErrors::new());
            failure.set(None);
            busy.set(true);

            let auth = auth.clone();
            let navigator = navigator.clone();
            let (email, password) = ((*email).clone(), (*password).clone());
            let (errors, failure, busy) = (errors.clone(), failure.clone(), busy.clone());
            spawn_local(async move {
                match auth.login(&email, &password).await {
                    Ok(session) => {
                        Dispatch::<AppStore>::new().reduce_mut(|store| set_session(store, session));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Home);
                        }
                    }
                    Err(ClientError::Validation(found)) => {
                        errors.set(found);
                        busy.set(false);
                    }
                    Err(err) => {
                        failure.set(Some(err.user_message()));
                        busy.set(false);
                    }
                }
            });
        })
    };

    let setter = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |value: String| handle.set(value))
    };

    html! {
        <section class="auth-page">
            <form class="card narrow stack" {onsubmit} novalidate={true}>
                <h2>{t("auth.login_title", "Masuk")}</h2>
                {(*failure).as_ref().map_or_else(|| html! {}, |message| html! {
                    <p class="error-text" role="alert">{message.clone()}</p>
                })}
                <TextField
                    label={t("auth.email", "Email")}
                    name="email"
                    input_type="email"
                    value={(*email).clone()}
                    on_input={setter(&email)}
                    error={field_error(&errors, "email")}
                />
                <TextField
                    label={t("auth.password", "Password")}
                    name="password"
                    input_type="password"
                    value={(*password).clone()}
                    on_input={setter(&password)}
                    error={field_error(&errors, "password")}
                />
                <button class="solid" type="submit" disabled={*busy}>
                    {t("auth.login", "Masuk")}
                </button>
                <p class="muted">
                    <Link<Route> to={Route::Register}>{t("auth.to_register", "Daftar")}</Link<Route>>
                </p>
            </form>
        </section>
    }
}
