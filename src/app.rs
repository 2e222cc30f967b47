use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{Clock, ClockHandle, DefectsState, FleetState},
    infra::fleet_api::FleetClient,
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{DefectsPage, FleetPage, SettingsPage},
        shell::Shell,
    },
    util::{assets, config::AppConfig, persistence::save_settings},
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/fleet")]
    Fleet {},
    #[route("/defects")]
    Defects {},
    #[route("/settings")]
    Settings {},
}

/// Bumping a counter re-runs the matching fetch resource. The previous
/// in-flight request is dropped when the resource restarts.
#[derive(Clone, Copy, PartialEq)]
pub struct ReloadTriggers {
    fleet: Signal<u64>,
    defects: Signal<u64>,
}

impl ReloadTriggers {
    pub fn reload_fleet(mut self) {
        self.fleet += 1;
    }

    pub fn reload_defects(mut self) {
        self.defects += 1;
    }
}

#[component]
pub fn App() -> Element {
    let config = use_signal(AppConfig::load);
    use_context_provider(|| config);

    let clock = use_context_provider(ClockHandle::default);

    let fleet = use_signal(FleetState::default);
    use_context_provider(|| fleet);

    let defects = use_signal(DefectsState::default);
    use_context_provider(|| defects);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let triggers = ReloadTriggers {
        fleet: use_signal(|| 0_u64),
        defects: use_signal(|| 0_u64),
    };
    use_context_provider(|| triggers);

    let _fleet_fetch = use_resource(move || {
        let _ = (triggers.fleet)();
        let cfg = config();
        let clock = clock.clone();
        async move { fetch_fleet(cfg, clock, fleet, toasts).await }
    });

    let _defects_fetch = use_resource(move || {
        let _ = (triggers.defects)();
        let cfg = config();
        async move { fetch_defects(cfg, defects, toasts).await }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Saves the settings file and reports the outcome as a toast.
pub fn persist_settings(config: &AppConfig, toasts: Signal<Vec<ToastMessage>>) -> bool {
    match save_settings(config) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "failed to save settings");
            push_toast(toasts, ToastKind::Error, format!("Could not save settings: {err}"));
            false
        }
    }
}

async fn fetch_fleet(
    config: AppConfig,
    clock: ClockHandle,
    mut fleet: Signal<FleetState>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    let ticket = fleet.with_mut(FleetState::begin_fetch);
    let result = match FleetClient::from_config(&config) {
        Ok(client) => client.get_vessels().await,
        Err(err) => Err(err),
    };
    let failure = result.as_ref().err().map(ToString::to_string);

    let applied = fleet.with_mut(|state| state.finish_fetch(ticket, result, clock.now()));
    if let (true, Some(message)) = (applied, failure) {
        push_toast(
            toasts,
            ToastKind::Error,
            format!("Failed to load vessel data: {message}"),
        );
    }
}

async fn fetch_defects(
    config: AppConfig,
    mut defects: Signal<DefectsState>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    let ticket = defects.with_mut(DefectsState::begin_fetch);
    let result = match FleetClient::from_config(&config) {
        Ok(client) => client.get_defects().await,
        Err(err) => Err(err),
    };
    let failure = result.as_ref().err().map(ToString::to_string);

    let applied = defects.with_mut(|state| state.finish_fetch(ticket, result));
    if let (true, Some(message)) = (applied, failure) {
        push_toast(
            toasts,
            ToastKind::Error,
            format!("Failed to load defects: {message}"),
        );
    }
}

#[component]
pub fn Fleet() -> Element {
    rsx! { Shell { FleetPage {} } }
}

#[component]
pub fn Defects() -> Element {
    rsx! { Shell { DefectsPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
