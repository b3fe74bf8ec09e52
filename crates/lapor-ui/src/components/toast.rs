use gloo::timers::callback::Timeout;
use yew::prelude::*;
use yewdux::prelude::use_store;

use crate::app::use_bundle;
use crate::core::store::{AppStore, Toast, ToastKind, dismiss_toast};

const TOAST_LIFETIME_MS: u32 = 4000;

#[function_component(ToastHost)]
pub(crate) fn toast_host() -> Html {
    let bundle = use_bundle();
    let (store, dispatch) = use_store::<AppStore>();
    let on_dismiss = Callback::from(move |id: u64| {
        dispatch.reduce_mut(|store| dismiss_toast(store, id));
    });
    {
        let on_dismiss = on_dismiss.clone();
        use_effect_with_deps(
            move |list: &Vec<Toast>| {
                let handles: Vec<Timeout> = list
                    .iter()
                    .map(|toast| {
                        let on_dismiss = on_dismiss.clone();
                        let id = toast.id;
                        Timeout::new(TOAST_LIFETIME_MS, move || on_dismiss.emit(id))
                    })
                    .collect();
                move || drop(handles)
            },
            store.toasts.clone(),
        );
    }

    let dismiss_label = bundle.text("toast.dismiss", "Tutup");
    html! {
        <div class="toast-host" aria-live="polite" aria-atomic="true">
            {for store.toasts.iter().map(|toast| render_toast(toast, on_dismiss.clone(), dismiss_label.clone()))}
        </div>
    }
}

fn render_toast(toast: &Toast, on_dismiss: Callback<u64>, dismiss_label: String) -> Html {
    let class = match toast.kind {
        ToastKind::Info => "info",
        ToastKind::Success => "success",
        ToastKind::Error => "error",
    };
    let id = toast.id;
    let on_close = Callback::from(move |_: MouseEvent| on_dismiss.emit(id));

    html! {
        <div class={classes!("toast", class)} role="status">
            <span>{toast.message.clone()}</span>
            <button class="ghost" aria-label={dismiss_label} onclick={on_close}>{"✕"}</button>
        </div>
    }
}
