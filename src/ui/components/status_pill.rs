use dioxus::prelude::*;

use crate::{domain::DefectStatus, ui::theme};

/// Coloured dot plus the vessel's event label.
#[component]
pub fn StatusPill(status: Option<String>) -> Element {
    let tone = theme::StatusTone::of(status.as_deref());
    let label = status.unwrap_or_else(|| "—".to_string());

    rsx! {
        span {
            class: "status-indicator",
            span { class: "{tone.dot_class()}" }
            "{label}"
        }
    }
}

#[component]
pub fn DefectStatusPill(status: Option<String>) -> Element {
    let status = DefectStatus::parse(status.as_deref());
    rsx! {
        span { class: "{theme::defect_status_class(status)}", "{status.label()}" }
    }
}
