use dioxus::prelude::*;

use crate::ui::theme;

#[component]
pub fn RiskBadge(score: Option<u8>) -> Element {
    let class = theme::risk_badge_class(score);
    let label = score.map(|s| s.to_string()).unwrap_or_else(|| "—".to_string());

    rsx! {
        span { class: "{class}", title: "Risk score (0-100)", "{label}" }
    }
}
