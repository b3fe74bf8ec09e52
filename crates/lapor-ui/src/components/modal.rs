use yew::prelude::*;

use crate::app::use_bundle;

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    pub title: String,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub wide: bool,
    #[prop_or_default]
    pub children: Children,
}

/// Overlay dialog; clicking the backdrop closes it.
#[function_component(Modal)]
pub(crate) fn modal(props: &ModalProps) -> Html {
    let bundle = use_bundle();
    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let keep_open = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div
                class={classes!("modal", props.wide.then_some("modal-wide"))}
                role="dialog"
                aria-modal="true"
                onclick={keep_open}
            >
                <header class="modal-header">
                    <h3>{props.title.clone()}</h3>
                    <button class="ghost" aria-label={bundle.text("modal.close", "Tutup")} onclick={close}>{"✕"}</button>
                </header>
                <div class="modal-body">
                    {for props.children.iter()}
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ConfirmDialogProps {
    pub title: String,
    pub message: String,
    #[prop_or_default]
    pub busy: bool,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ConfirmDialog)]
pub(crate) fn confirm_dialog(props: &ConfirmDialogProps) -> Html {
    let bundle = use_bundle();
    let t = |key: &str, default: &str| bundle.text(key, default);
    let confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_: MouseEvent| on_confirm.emit(()))
    };
    let cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    html! {
        <Modal title={props.title.clone()} on_close={props.on_cancel.clone()}>
            <p>{props.message.clone()}</p>
            <div class="actions">
                <button class="ghost" onclick={cancel} disabled={props.busy}>{t("form.cancel", "Batal")}</button>
                <button class="danger" onclick={confirm} disabled={props.busy}>{t("modal.confirm", "Ya, hapus")}</button>
            </div>
        </Modal>
    }
}
