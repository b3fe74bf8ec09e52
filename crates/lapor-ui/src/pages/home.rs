use std::cell::Cell;
use std::rc::Rc;

use gloo::console;
use lapor_client::ReportStats;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::{Route, use_bundle, use_services};
use crate::core::store::{AppStore, push_error};
use crate::core::view::stat_tiles;

#[function_component(HomePage)]
pub(crate) fn home_page() -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let services = use_services();
    let name = use_selector(|store: &AppStore| {
        store.session.display_name().map(str::to_string)
    });
    let stats = use_state(ReportStats::default);
    let loading = use_state(|| true);
    {
        let stats = stats.clone();
        let loading = loading.clone();
        let repository = services.repository.clone();
        use_effect_with_deps(
            move |_| {
                let active = Rc::new(Cell::new(true));
                {
                    let active = active.clone();
                    spawn_local(async move {
                        let result = repository.list().await;
                        if !active.get() {
                            return;
                        }
                        match result {
                            Ok(reports) => stats.set(ReportStats::from_reports(&reports)),
                            Err(err) => {
                                console::error!("failed to load report totals", err.to_string());
                                Dispatch::<AppStore>::new().reduce_mut(|store| {
                                    push_error(store, &err);
                                });
                            }
                        }
                        loading.set(false);
                    });
                }
                move || active.set(false)
            },
            (),
        );
    }

    let greeting = name.as_deref().map_or_else(String::new, |name| format!("{name} · "));
    html! {
        <section class="home">
            <div class="card hero">
                <h1>{t("home.title", "Selamat datang")}</h1>
                <p class="muted">{greeting}{t("home.body", "")}</p>
                <div class="actions">
                    <Link<Route> to={Route::AddReport} classes={classes!("solid")}>
                        {t("home.cta_add", "Buat Laporan")}
                    </Link<Route>>
                    <Link<Route> to={Route::Reports} classes={classes!("ghost")}>
                        {t("home.cta_list", "Lihat Laporan")}
                    </Link<Route>>
                </div>
            </div>
            <div class="stat-grid">
                {for stat_tiles(&stats, *loading).into_iter().map(|tile| html! {
                    <div class={classes!("stat-tile", tile.variant)}>
                        <span class="stat-value">{tile.value}</span>
                        <span class="stat-label">{t(tile.label_key, "")}</span>
                    </div>
                })}
            </div>
        </section>
    }
}
