use dioxus::prelude::*;

use crate::ui::theme;

/// Edit panel for one vessel's free-text comment. Mount it with a `key` per
/// IMO so the draft starts from that vessel's stored value.
#[component]
pub fn CommentEditor(
    vessel_name: String,
    imo: String,
    initial: String,
    saving: bool,
    error: Option<String>,
    on_save: EventHandler<String>,
    on_close: EventHandler<()>,
) -> Element {
    let mut draft = use_signal(|| initial.clone());
    let unchanged = draft() == initial;

    rsx! {
        div {
            class: "comment-editor__backdrop",
            onclick: move |_| {
                if !saving {
                    on_close.call(());
                }
            },
            section {
                class: "{theme::panel()} comment-editor",
                role: "dialog",
                aria_label: "Edit comment",
                onclick: move |evt| evt.stop_propagation(),
                header {
                    class: "comment-editor__header",
                    h2 { "{vessel_name}" }
                    span { class: "muted", "IMO {imo}" }
                }
                textarea {
                    class: "{theme::input_class()} comment-editor__text",
                    rows: "6",
                    placeholder: "Add a comment for this vessel",
                    disabled: saving,
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                }
                if let Some(message) = error {
                    p { class: "comment-editor__error", "⚠ {message}" }
                }
                footer {
                    class: "comment-editor__actions",
                    button {
                        class: "{theme::btn_ghost()}",
                        disabled: saving,
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "{theme::btn_primary()}",
                        disabled: saving || unchanged,
                        onclick: move |_| on_save.call(draft()),
                        if saving { "Saving…" } else { "Save" }
                    }
                }
            }
        }
    }
}
