use dioxus::prelude::*;

use crate::ui::theme;

#[component]
pub fn KpiCard(
    title: String,
    value: String,
    description: Option<String>,
    #[props(default)] alert: bool,
) -> Element {
    let value_class = if alert { "kpi__value kpi__value--alert" } else { "kpi__value" };
    rsx! {
        div {
            class: "{theme::panel()} kpi",
            h3 { class: "{theme::label_class()}", "{title}" }
            p { class: "{value_class}", "{value}" }
            if let Some(desc) = description {
                p { class: "kpi__hint", "{desc}" }
            }
        }
    }
}
