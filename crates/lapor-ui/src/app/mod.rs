use gloo::utils::document;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::components::navbar::Navbar;
use crate::components::toast::ToastHost;
use crate::core::nav::{Page, redirect_for};
use crate::core::store::{AppStore, set_session};
use crate::i18n::TranslationBundle;
use crate::pages::add::AddReportPage;
use crate::pages::edit::EditReportPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::register::RegisterPage;
use crate::pages::reports::ReportsPage;
use crate::services::preferences::{api_base_url, load_locale};
pub(crate) use routes::Route;
pub(crate) use services::Services;

mod routes;
mod services;

/// Mount the application on `<body>`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let services = Services::new(&api_base_url());
    let session = services.session.session();
    let locale = load_locale();
    Dispatch::<AppStore>::new().reduce_mut(move |store| {
        set_session(store, session);
        store.locale = locale;
    });
    yew::Renderer::<LaporApp>::with_props(LaporAppProps { services }).render();
}

#[derive(Properties, PartialEq)]
struct LaporAppProps {
    services: Services,
}

#[function_component(LaporApp)]
fn lapor_app(props: &LaporAppProps) -> Html {
    let locale = use_selector(|store: &AppStore| store.locale);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };
    {
        let locale = *locale;
        use_effect_with_deps(
            move |locale| {
                if let Some(root) = document().document_element() {
                    let _ = root.set_attribute("lang", locale.code());
                }
                || ()
            },
            locale,
        );
    }

    html! {
        <ContextProvider<Services> context={props.services.clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <BrowserRouter>
                    <Navbar />
                    <main class="page">
                        <Switch<Route> render={switch} />
                    </main>
                    <ToastHost />
                </BrowserRouter>
            </ContextProvider<TranslationBundle>>
        </ContextProvider<Services>>
    }
}

#[allow(clippy::needless_pass_by_value)]
fn switch(route: Route) -> Html {
    html! { <Guarded {route} /> }
}

#[derive(Properties, PartialEq)]
struct GuardedProps {
    route: Route,
}

/// Applies the access rule before rendering a page.
#[function_component(Guarded)]
fn guarded(props: &GuardedProps) -> Html {
    let session = use_selector(|store: &AppStore| store.session.clone());
    let page = Page::from(&props.route);
    if let Some(target) = redirect_for(&page, &session) {
        return html! { <Redirect<Route> to={Route::from(target)} /> };
    }
    match page {
        Page::Home => html! { <HomePage /> },
        Page::Reports => html! { <ReportsPage /> },
        Page::AddReport => html! { <AddReportPage /> },
        Page::EditReport { id } => html! { <EditReportPage {id} /> },
        Page::Login => html! { <LoginPage /> },
        Page::Register => html! { <RegisterPage /> },
        Page::NotFound => html! { <NotFoundPage /> },
    }
}

/// Translation bundle from context, defaulting to Indonesian.
#[hook]
pub(crate) fn use_bundle() -> TranslationBundle {
    use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(crate::i18n::DEFAULT_LOCALE))
}

/// Client services from context.
#[hook]
pub(crate) fn use_services() -> Services {
    use_context::<Services>().unwrap_or_else(|| Services::new(&api_base_url()))
}
