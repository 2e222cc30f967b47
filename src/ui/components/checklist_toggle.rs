use dioxus::prelude::*;

/// Shows the stored checklist flag. Clicking asks the parent to persist the
/// flipped value; the display only changes once the parent's data does.
#[component]
pub fn ChecklistToggle(checked: bool, busy: bool, on_toggle: EventHandler<bool>) -> Element {
    let class = match (checked, busy) {
        (_, true) => "checkbox checkbox--busy",
        (true, false) => "checkbox checkbox--checked",
        (false, false) => "checkbox",
    };

    rsx! {
        button {
            class: "{class}",
            role: "checkbox",
            aria_checked: "{checked}",
            aria_busy: "{busy}",
            disabled: busy,
            onclick: move |evt| {
                evt.stop_propagation();
                if !busy {
                    on_toggle.call(!checked);
                }
            },
            if checked { "✓" }
        }
    }
}
