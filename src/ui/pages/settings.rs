use dioxus::prelude::*;

use crate::{
    app::persist_settings,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::{config::AppConfig, version},
};

/// Editable copy of the settings, kept as raw input text until applied.
#[derive(Clone, Debug, PartialEq)]
struct SettingsForm {
    api_base_url: String,
    defects_base_url: String,
    timeout_secs: String,
    virtualize: bool,
    scroll_shadows: bool,
    horizontal_scroller: bool,
    voyage_filter: bool,
    port_filter: bool,
    status_filter: bool,
    doc_filter: bool,
}

impl SettingsForm {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            defects_base_url: config.defects_base_url.clone(),
            timeout_secs: config.request_timeout_secs.to_string(),
            virtualize: config.table.virtualize,
            scroll_shadows: config.table.show_scroll_shadows,
            horizontal_scroller: config.table.show_horizontal_scroller,
            voyage_filter: config.filters.voyage,
            port_filter: config.filters.ports,
            status_filter: config.filters.statuses,
            doc_filter: config.filters.docs,
        }
    }

    /// Applies the form on top of `base`. Fields the form does not expose
    /// keep their current values.
    fn apply(&self, base: &AppConfig) -> Result<AppConfig, String> {
        let timeout = self
            .timeout_secs
            .trim()
            .parse::<u64>()
            .map_err(|_| "Timeout must be a whole number of seconds".to_string())?;

        let mut next = base.clone();
        next.api_base_url = self.api_base_url.trim().to_string();
        next.defects_base_url = self.defects_base_url.trim().to_string();
        next.request_timeout_secs = timeout;
        next.table.virtualize = self.virtualize;
        next.table.show_scroll_shadows = self.scroll_shadows;
        next.table.show_horizontal_scroller = self.horizontal_scroller;
        next.filters.voyage = self.voyage_filter;
        next.filters.ports = self.port_filter;
        next.filters.statuses = self.status_filter;
        next.filters.docs = self.doc_filter;
        next.validate().map_err(|err| err.to_string())?;
        Ok(next)
    }
}

#[component]
pub fn SettingsPage() -> Element {
    let config = use_context::<Signal<AppConfig>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let mut form = use_signal(|| SettingsForm::from_config(&config.peek()));

    let current = form();
    let dirty = current != SettingsForm::from_config(&config());

    let on_save = move |_| {
        let mut config = config;
        let next = match form.peek().apply(&config.peek()) {
            Ok(next) => next,
            Err(message) => {
                push_toast(toasts, ToastKind::Error, message);
                return;
            }
        };
        if persist_settings(&next, toasts) {
            tracing::info!(api = %next.api_base_url, "settings saved");
            config.set(next);
            push_toast(toasts, ToastKind::Success, "Settings saved. Reloading data.");
        }
    };

    let on_reset = move |_| {
        form.set(SettingsForm::from_config(&AppConfig::default()));
        push_toast(
            toasts,
            ToastKind::Info,
            "Defaults restored in the form. Save to apply them.",
        );
    };

    rsx! {
        div {
            class: "page settings",
            section {
                class: "{theme::panel()}",
                h2 { class: "{theme::label_class()}", "Data Sources" }
                div {
                    class: "form-grid",
                    label {
                        class: "{theme::label_class()}",
                        "Fleet API base URL"
                        input {
                            class: "{theme::input_class()}",
                            value: "{current.api_base_url}",
                            oninput: move |evt| form.with_mut(|f| f.api_base_url = evt.value()),
                        }
                    }
                    label {
                        class: "{theme::label_class()}",
                        "Defects API base URL"
                        input {
                            class: "{theme::input_class()}",
                            value: "{current.defects_base_url}",
                            oninput: move |evt| form.with_mut(|f| f.defects_base_url = evt.value()),
                        }
                    }
                    label {
                        class: "{theme::label_class()}",
                        "Request timeout (seconds)"
                        input {
                            class: "{theme::input_class()}",
                            r#type: "number",
                            min: "1",
                            max: "300",
                            value: "{current.timeout_secs}",
                            oninput: move |evt| form.with_mut(|f| f.timeout_secs = evt.value()),
                        }
                    }
                }
            }

            section {
                class: "{theme::panel()}",
                h2 { class: "{theme::label_class()}", "Tables" }
                Switch {
                    label: "Virtualize long tables",
                    checked: current.virtualize,
                    on_change: move |on: bool| form.with_mut(|f| f.virtualize = on),
                }
                Switch {
                    label: "Scroll shadows",
                    checked: current.scroll_shadows,
                    on_change: move |on: bool| form.with_mut(|f| f.scroll_shadows = on),
                }
                Switch {
                    label: "Horizontal scroll bar above tables",
                    checked: current.horizontal_scroller,
                    on_change: move |on: bool| form.with_mut(|f| f.horizontal_scroller = on),
                }
            }

            section {
                class: "{theme::panel()}",
                h2 { class: "{theme::label_class()}", "Fleet Filters" }
                Switch {
                    label: "Voyage filter",
                    checked: current.voyage_filter,
                    on_change: move |on: bool| form.with_mut(|f| f.voyage_filter = on),
                }
                Switch {
                    label: "Arrival port filter",
                    checked: current.port_filter,
                    on_change: move |on: bool| form.with_mut(|f| f.port_filter = on),
                }
                Switch {
                    label: "Event type filter",
                    checked: current.status_filter,
                    on_change: move |on: bool| form.with_mut(|f| f.status_filter = on),
                }
                Switch {
                    label: "DOC filter",
                    checked: current.doc_filter,
                    on_change: move |on: bool| form.with_mut(|f| f.doc_filter = on),
                }
            }

            div {
                class: "settings__actions",
                button { class: "{theme::btn_primary()}", disabled: !dirty, onclick: on_save, "Save" }
                button { class: "{theme::btn_ghost()}", onclick: on_reset, "Reset Defaults" }
            }

            p { class: "muted settings__build", "{version::build_label()}" }
        }
    }
}

#[component]
fn Switch(label: &'static str, checked: bool, on_change: EventHandler<bool>) -> Element {
    rsx! {
        label {
            class: "switch",
            input {
                r#type: "checkbox",
                checked,
                onchange: move |evt| on_change.call(evt.checked()),
            }
            span { "{label}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_round_trips_unchanged_config() {
        let config = AppConfig::default();
        let form = SettingsForm::from_config(&config);
        assert_eq!(form.apply(&config), Ok(config));
    }

    #[test]
    fn form_rejects_bad_input() {
        let config = AppConfig::default();
        let mut form = SettingsForm::from_config(&config);
        form.timeout_secs = "soon".into();
        assert!(form.apply(&config).is_err());

        let mut form = SettingsForm::from_config(&config);
        form.api_base_url = "ftp://fleet".into();
        assert!(form.apply(&config).is_err());
    }

    #[test]
    fn form_values_are_trimmed_and_applied() {
        let config = AppConfig::default();
        let mut form = SettingsForm::from_config(&config);
        form.api_base_url = "  https://fleet.example.com ".into();
        form.timeout_secs = "45".into();
        form.doc_filter = true;
        let next = form.apply(&config).unwrap();
        assert_eq!(next.api_base_url, "https://fleet.example.com");
        assert_eq!(next.request_timeout_secs, 45);
        assert!(next.filters.docs);
    }
}
