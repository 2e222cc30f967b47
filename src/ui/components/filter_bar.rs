//! Search box, voyage radio and the multi-select menus of the fleet view.

use dioxus::prelude::*;

use crate::{
    domain::{FilterBarConfig, FilterState, Selection, VesselField, VoyageFilter},
    ui::theme,
};

/// Distinct values offered by each multi-select menu.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub ports: Vec<String>,
    pub statuses: Vec<String>,
    pub docs: Vec<String>,
}

/// Counter shown on a menu button, e.g. `3/7`.
pub fn selection_counter(selection: &Selection<String>, options: &[String]) -> String {
    format!("{}/{}", selection.selected_count(options), options.len())
}

#[component]
pub fn FilterBar(
    filters: Signal<FilterState>,
    options: FilterOptions,
    config: FilterBarConfig,
) -> Element {
    let mut filters = filters;
    let current = filters();
    let can_reset = !current.is_default();

    rsx! {
        div {
            class: "{theme::panel()} filter-bar",
            input {
                class: "{theme::input_class()} filter-bar__search",
                r#type: "search",
                placeholder: "Search vessel, IMO or arrival port",
                value: "{current.search}",
                oninput: move |evt| filters.with_mut(|f| f.search = evt.value()),
            }
            if config.voyage {
                fieldset {
                    class: "filter-bar__voyage",
                    legend { class: "{theme::label_class()}", "Voyage" }
                    for option in VoyageFilter::OPTIONS {
                        label {
                            key: "{option.label()}",
                            class: "radio",
                            input {
                                r#type: "radio",
                                name: "voyage",
                                checked: current.voyage == option,
                                onchange: move |_| filters.with_mut(|f| f.voyage = option),
                            }
                            "{option.label()}"
                        }
                    }
                }
            }
            if config.ports {
                MultiSelectMenu {
                    title: "Arrival Port",
                    field: VesselField::ArrivalPort,
                    options: options.ports.clone(),
                    filters,
                }
            }
            if config.statuses {
                MultiSelectMenu {
                    title: "Event Type",
                    field: VesselField::EventType,
                    options: options.statuses.clone(),
                    filters,
                }
            }
            if config.docs {
                MultiSelectMenu {
                    title: "DOC",
                    field: VesselField::OfficeDoc,
                    options: options.docs.clone(),
                    filters,
                }
            }
            button {
                class: "{theme::btn_ghost()}",
                disabled: !can_reset,
                onclick: move |_| filters.with_mut(FilterState::reset),
                "Reset"
            }
        }
    }
}

#[component]
fn MultiSelectMenu(
    title: &'static str,
    field: VesselField,
    options: Vec<String>,
    filters: Signal<FilterState>,
) -> Element {
    let mut filters = filters;
    let mut open = use_signal(|| false);
    let selection = filters.with(|f| f.selection(field).clone());
    let counter = selection_counter(&selection, &options);
    let entries: Vec<(String, bool)> = options
        .iter()
        .map(|option| (option.clone(), selection.contains(option)))
        .collect();

    rsx! {
        div {
            class: "multi-select",
            button {
                class: "{theme::btn_small(open())}",
                aria_expanded: "{open()}",
                onclick: move |_| open.toggle(),
                "{title} "
                span { class: "multi-select__count", "{counter}" }
            }
            if open() {
                div {
                    class: "multi-select__menu",
                    div {
                        class: "multi-select__actions",
                        button {
                            class: "link-button",
                            onclick: move |_| filters.with_mut(|f| *f.selection_mut(field) = Selection::All),
                            "Select all"
                        }
                        button {
                            class: "link-button",
                            onclick: move |_| filters.with_mut(|f| *f.selection_mut(field) = Selection::none()),
                            "Deselect all"
                        }
                    }
                    if entries.is_empty() {
                        p { class: "muted", "No values" }
                    }
                    for (value, checked) in entries {
                        MultiSelectOption {
                            key: "{value}",
                            value,
                            checked,
                            field,
                            options: options.clone(),
                            filters,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn MultiSelectOption(
    value: String,
    checked: bool,
    field: VesselField,
    options: Vec<String>,
    filters: Signal<FilterState>,
) -> Element {
    let mut filters = filters;
    let label = value.clone();

    rsx! {
        label {
            class: "multi-select__option",
            input {
                r#type: "checkbox",
                checked,
                onchange: move |_| {
                    filters.with_mut(|f| f.selection_mut(field).toggle(&value, &options));
                },
            }
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_reflects_selection() {
        let options = vec!["Gladstone".to_string(), "Hay Point".into(), "Newcastle".into()];
        let mut selection = Selection::All;
        assert_eq!(selection_counter(&selection, &options), "3/3");
        selection.toggle(&"Hay Point".to_string(), &options);
        assert_eq!(selection_counter(&selection, &options), "2/3");
        assert_eq!(selection_counter(&Selection::none(), &options), "0/3");
    }
}
