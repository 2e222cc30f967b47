use dioxus::prelude::*;

use crate::{
    app::ReloadTriggers,
    domain::{
        distribution_over, search_defects, top_categories, DefectRecord, DefectStatus, DefectsState,
        CRITICALITY_CATEGORIES, STATUS_CATEGORIES,
    },
    ui::{
        components::{
            charts::{BarChart, PieChart},
            defect_table::DefectTable,
            kpi_card::KpiCard,
        },
        theme,
    },
    util::config::AppConfig,
};

const TOP_EQUIPMENT: usize = 5;

fn open_count(defects: &[DefectRecord]) -> usize {
    defects
        .iter()
        .filter(|d| d.normalized_status() != DefectStatus::Closed)
        .count()
}

#[component]
pub fn DefectsPage() -> Element {
    let config = use_context::<Signal<AppConfig>>();
    let defects = use_context::<Signal<DefectsState>>();
    let triggers = use_context::<ReloadTriggers>();
    let mut query = use_signal(String::new);

    let state = defects();
    let matching = search_defects(&state.defects, &query());

    let statuses = distribution_over(
        &STATUS_CATEGORIES,
        matching.iter().map(|d| Some(d.normalized_status().label())),
    );
    let criticality = distribution_over(
        &CRITICALITY_CATEGORIES,
        matching.iter().map(|d| d.criticality.as_deref()),
    );
    let equipment = top_categories(matching.iter().map(|d| d.equipment.as_deref()), TOP_EQUIPMENT);
    let unresolved = open_count(&matching);
    let summary = if matching.len() == state.defects.len() {
        matching.len().to_string()
    } else {
        format!("{} of {}", matching.len(), state.defects.len())
    };

    rsx! {
        div {
            class: "page",
            div {
                class: "page__header",
                h1 { "Defects" }
                button {
                    class: "{theme::btn_primary()}",
                    disabled: state.loading,
                    onclick: move |_| triggers.reload_defects(),
                    if state.loading { "Loading…" } else { "Refresh" }
                }
            }

            if let Some(error) = state.error.clone() {
                div {
                    class: "banner banner--error",
                    role: "alert",
                    span { "Could not load defects: {error}" }
                    button {
                        class: "{theme::btn_ghost()}",
                        onclick: move |_| triggers.reload_defects(),
                        "Retry"
                    }
                }
            }

            div {
                class: "kpi-grid",
                KpiCard {
                    title: "Defects".to_string(),
                    value: summary,
                    description: Some(format!("{unresolved} not closed")),
                    alert: unresolved > 0,
                }
            }

            div {
                class: "chart-grid",
                PieChart { title: "Status".to_string(), points: statuses }
                PieChart { title: "Criticality".to_string(), points: criticality }
                BarChart { title: "Top Equipment".to_string(), points: equipment }
            }

            div {
                class: "{theme::panel()} filter-bar",
                input {
                    class: "{theme::input_class()} filter-bar__search",
                    r#type: "search",
                    placeholder: "Search defects",
                    value: "{query}",
                    oninput: move |evt| query.set(evt.value()),
                }
                if !query().is_empty() {
                    button {
                        class: "{theme::btn_ghost()}",
                        onclick: move |_| query.set(String::new()),
                        "Clear"
                    }
                }
            }

            if state.loading && state.defects.is_empty() {
                div { class: "{theme::panel()} placeholder", "Loading defects…" }
            } else {
                DefectTable { defects: matching, config: config().table.clone() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_defects_are_not_counted_as_open() {
        let defects = vec![
            DefectRecord {
                status: Some("OPEN".into()),
                ..DefectRecord::default()
            },
            DefectRecord {
                status: Some("closed".into()),
                ..DefectRecord::default()
            },
            DefectRecord::default(),
        ];
        assert_eq!(open_count(&defects), 2);
    }
}
