use yew::prelude::*;
use yew_router::prelude::*;

use crate::app::{Route, use_bundle};

#[function_component(NotFoundPage)]
pub(crate) fn not_found_page() -> Html {
    let bundle = use_bundle();
    html! {
        <section class="card narrow">
            <h2>{bundle.text("not_found.title", "Halaman tidak ditemukan")}</h2>
            <Link<Route> to={Route::Home} classes={classes!("solid")}>
                {bundle.text("not_found.back", "Kembali")}
            </Link<Route>>
        </section>
    }
}
