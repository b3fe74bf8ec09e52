use std::cell::Cell;
use std::rc::Rc;

use gloo::console;
use lapor_client::ObjectUrl;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::{use_bundle, use_services};

enum ImageState {
    Loading,
    Ready(Rc<ObjectUrl>),
    Fallback(String),
    Unavailable,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ProtectedImageProps {
    pub foto: String,
    pub alt: String,
    #[prop_or_default]
    pub class: Classes,
}

/// Photo fetched through the authenticated endpoint, falling back to public
/// storage and then to a placeholder.
#[function_component(ProtectedImage)]
pub(crate) fn protected_image(props: &ProtectedImageProps) -> Html {
    let bundle = use_bundle();
    let services = use_services();
    let state = use_state(|| ImageState::Loading);
    {
        let state = state.clone();
        let images = services.images.clone();
        use_effect_with_deps(
            move |foto: &String| {
                state.set(ImageState::Loading);
                let active = Rc::new(Cell::new(true));
                let foto = foto.clone();
                {
                    let active = active.clone();
                    spawn_local(async move {
                        let next = match images.load(&foto).await {
                            Ok(handle) => ImageState::Ready(Rc::new(handle)),
                            Err(err) => {
                                console::warn!("protected photo fetch failed", err.to_string());
                                ImageState::Fallback(images.public_url(&foto))
                            }
                        };
                        if active.get() {
                            state.set(next);
                        }
                    });
                }
                move || active.set(false)
            },
            props.foto.clone(),
        );
    }

    let onerror = {
        let state = state.clone();
        let images = services.images.clone();
        let foto = props.foto.clone();
        Callback::from(move |_: Event| match &*state {
            ImageState::Ready(_) => state.set(ImageState::Fallback(images.public_url(&foto))),
            ImageState::Fallback(_) => state.set(ImageState::Unavailable),
            ImageState::Loading | ImageState::Unavailable => {}
        })
    };

    let src = match &*state {
        ImageState::Loading => {
            return html! { <span class="muted">{bundle.text("list.loading", "Memuat…")}</span> };
        }
        ImageState::Unavailable => {
            return html! {
                <span class="muted">{bundle.text("list.photo_unavailable", "Foto tidak tersedia")}</span>
            };
        }
        ImageState::Ready(handle) => handle.url().to_string(),
        ImageState::Fallback(url) => url.clone(),
    };

    html! {
        <img class={props.class.clone()} {src} alt={props.alt.clone()} {onerror} />
    }
}
