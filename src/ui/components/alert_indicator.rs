use dioxus::prelude::*;

/// Red/yellow alert counter. Renders a dash when there are no alerts.
#[component]
pub fn AlertIndicator(red: u32, yellow: u32) -> Element {
    let total = red + yellow;
    if total == 0 {
        return rsx! { span { class: "muted", "—" } };
    }

    rsx! {
        span {
            class: "alert-indicator",
            title: "{total} alerts: {red} critical, {yellow} warnings",
            span { class: "alert-indicator__total", "{total}" }
            if red > 0 {
                span { class: "alert-indicator__bubble alert-indicator__bubble--red", "{red}" }
            }
            if yellow > 0 {
                span { class: "alert-indicator__bubble alert-indicator__bubble--yellow", "{yellow}" }
            }
        }
    }
}

/// Parses the "red:yellow" cell encoding used by the vessel table.
pub fn parse_alert_counts(raw: &str) -> (u32, u32) {
    let mut parts = raw.splitn(2, ':').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    (parts.next().unwrap_or(0), parts.next().unwrap_or(0))
}
