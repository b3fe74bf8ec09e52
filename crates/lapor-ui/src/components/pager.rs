use lapor_client::PageWindow;
use yew::prelude::*;

use crate::app::use_bundle;
use crate::core::view::pager_state;

#[derive(Properties, PartialEq)]
pub(crate) struct PagerProps {
    pub window: PageWindow,
    pub on_first: Callback<()>,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
    pub on_last: Callback<()>,
}

#[function_component(Pager)]
pub(crate) fn pager(props: &PagerProps) -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let pager = pager_state(&props.window, &t("list.page", "Hal"), &t("list.of", "dari"));
    let button = |label: String, callback: &Callback<()>, disabled: bool| {
        let callback = callback.clone();
        html! {
            <button class="ghost" {disabled} onclick={Callback::from(move |_: MouseEvent| callback.emit(()))}>
                {label}
            </button>
        }
    };

    html! {
        <nav class="pager" aria-label="pagination">
            <span class="muted">{pager.showing.clone()}</span>
            <div class="pager-controls">
                {button(t("list.first", "«"), &props.on_first, pager.at_start)}
                {button(t("list.prev", "‹"), &props.on_prev, pager.at_start)}
                <span class="pager-label">{pager.label.clone()}</span>
                {button(t("list.next", "›"), &props.on_next, pager.at_end)}
                {button(t("list.last", "»"), &props.on_last, pager.at_end)}
            </div>
        </nav>
    }
}
