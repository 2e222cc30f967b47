use dioxus::prelude::*;

use crate::{
    app::Route,
    domain::FleetState,
    util::version::{self, APP_NAME},
};

#[component]
pub fn Shell(children: Element) -> Element {
    let fleet = use_context::<Signal<FleetState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();
    let syncing = fleet.with(|state| state.loading);

    rsx! {
        div {
            class: "app",
            header {
                class: "app__header",
                div {
                    class: "app__brand",
                    span { class: "app__logo", "⚓" }
                    h1 { "{APP_NAME}" }
                    if syncing {
                        span { class: "app__sync", "syncing…" }
                    }
                }
                nav {
                    class: "app__nav",
                    NavButton {
                        active: matches!(current_route, Route::Fleet {}),
                        onclick: move |_| { nav.push(Route::Fleet {}); },
                        label: "Fleet",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Defects {}),
                        onclick: move |_| { nav.push(Route::Defects {}); },
                        label: "Defects",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Settings",
                    }
                }
                span { class: "app__version", "{version::version_label()}" }
            }
            main { class: "app__main", {children} }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { "nav-button nav-button--active" } else { "nav-button" };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
