use gloo::console;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_store;

use crate::app::{Route, use_bundle, use_services};
use crate::core::nav::{Page, nav_items};
use crate::core::store::{AppStore, clear_session, push_error};
use crate::services::preferences::persist_locale;

/// Top bar; rendered only while signed in.
#[function_component(Navbar)]
pub(crate) fn navbar() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let (store, dispatch) = use_store::<AppStore>();
    let navigator = use_navigator();
    let current = use_route::<Route>().map_or(Page::NotFound, |route| Page::from(&route));
    let leaving = use_state(|| false);

    let session = &store.session;
    if !session.is_authenticated() {
        return html! {};
    }

    let on_logout = {
        let auth = services.auth.clone();
        let dispatch = dispatch.clone();
        let leaving = leaving.clone();
        Callback::from(move |_: MouseEvent| {
            if *leaving {
                return;
            }
            leaving.set(true);
            let auth = auth.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            let leaving = leaving.clone();
            spawn_local(async move {
                if let Err(err) = auth.logout().await {
                    console::error!("logout failed", err.to_string());
                    dispatch.reduce_mut(|store| {
                        push_error(store, &err);
                    });
                }
                dispatch.reduce_mut(clear_session);
                leaving.set(false);
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Login);
                }
            });
        })
    };

    let on_locale = {
        let next = store.locale.next();
        Callback::from(move |_: MouseEvent| {
            dispatch.reduce_mut(|store| store.locale = next);
            persist_locale(next);
        })
    };

    html! {
        <header class="navbar">
            <Link<Route> to={Route::Home} classes={classes!("brand")}>
                <strong>{t("app.brand", "Lapor Online")}</strong>
                <span class="muted">{t("app.tagline", "")}</span>
            </Link<Route>>
            <nav class="nav-links">
                {for nav_items().into_iter().map(|(page, key)| {
                    let active = page.is_active(&current);
                    html! {
                        <Link<Route> to={Route::from(page)} classes={classes!("nav-link", active.then_some("active"))}>
                            {t(key, "")}
                        </Link<Route>>
                    }
                })}
            </nav>
            <div class="nav-user">
                <button class="ghost" onclick={on_locale} title={t("nav.locale", "Bahasa")}>
                    {store.locale.next().label()}
                </button>
                {session.role.map_or_else(|| html! {}, |role| html! {
                    <span class={classes!("pill", role.as_str())}>{role.as_str()}</span>
                })}
                <span class="avatar" title={session.display_name().unwrap_or_default().to_string()}>
                    {session.initials()}
                </span>
                <button class="ghost" onclick={on_logout} disabled={*leaving}>
                    {t("nav.logout", "Keluar")}
                </button>
            </div>
        </header>
    }
}
