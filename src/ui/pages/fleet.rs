use dioxus::prelude::*;

use crate::{
    app::ReloadTriggers,
    domain::{
        apply_filters, arrival_timeline, count_by_port, high_risk_count, unique_values, CellValue,
        Clock, ClockHandle, ColumnKind, FilterState, FleetState, VesselField,
    },
    infra::fleet_api::FleetClient,
    ui::{
        components::{
            charts::BarChart,
            comment_editor::CommentEditor,
            data_table::format_cell,
            filter_bar::{FilterBar, FilterOptions},
            kpi_card::KpiCard,
            toast::{push_toast, ToastKind, ToastMessage},
            vessel_table::VesselTable,
        },
        theme,
    },
    util::config::AppConfig,
};

const TOP_PORTS: usize = 5;

#[component]
pub fn FleetPage() -> Element {
    let config = use_context::<Signal<AppConfig>>();
    let fleet = use_context::<Signal<FleetState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let triggers = use_context::<ReloadTriggers>();
    let clock = use_context::<ClockHandle>();

    let mut filters = use_signal(FilterState::default);
    let mut editing = use_signal(|| None::<String>);
    let saving = use_signal(|| false);
    let comment_error = use_signal(|| None::<String>);

    let settings = config();
    let state = fleet();
    let now = clock.now();

    let visible = apply_filters(&state.vessels, &filters());
    let options = FilterOptions {
        ports: unique_values(&state.vessels, VesselField::ArrivalPort),
        statuses: unique_values(&state.vessels, VesselField::EventType),
        docs: unique_values(&state.vessels, VesselField::OfficeDoc),
    };
    let high_risk = high_risk_count(&visible);
    let by_port = count_by_port(&visible, TOP_PORTS);
    let timeline = arrival_timeline(&visible, now);
    let undated = (timeline.unclassified > 0)
        .then(|| format!("{} vessel(s) without a usable ETA", timeline.unclassified));
    let pending: Vec<String> = state
        .vessels
        .iter()
        .filter(|v| state.is_checklist_pending(v.imo()))
        .map(|v| v.imo().to_string())
        .collect();
    let last_updated = state
        .last_updated
        .map(|at| format_cell(ColumnKind::DateTime, &CellValue::Date(at)))
        .unwrap_or_else(|| "Never".to_string());
    let count_label = if visible.len() == state.vessels.len() {
        visible.len().to_string()
    } else {
        format!("{} of {}", visible.len(), state.vessels.len())
    };
    let no_results = !state.vessels.is_empty() && visible.is_empty();
    let edit_target = editing().and_then(|imo| {
        state.vessel(&imo).map(|v| {
            (
                imo.clone(),
                v.name().to_string(),
                v.record.comments.clone().unwrap_or_default(),
            )
        })
    });

    let on_checklist = move |(imo, next): (String, bool)| {
        let mut fleet = fleet;
        if !fleet.with_mut(|s| s.begin_checklist_update(&imo)) {
            return;
        }
        let id = fleet.with(|s| s.vessel(&imo).and_then(|v| v.record.id.clone()));
        let cfg = config();
        spawn(async move {
            let mut fleet = fleet;
            let result = match FleetClient::from_config(&cfg) {
                Ok(client) => client.update_checklist(id.as_deref(), &imo, next).await,
                Err(err) => Err(err),
            };
            match fleet.with_mut(|s| s.finish_checklist_update(&imo, result)) {
                Ok(()) => push_toast(toasts, ToastKind::Success, "Checklist status updated."),
                Err(message) => push_toast(
                    toasts,
                    ToastKind::Error,
                    format!("Failed to update checklist: {message}"),
                ),
            }
        });
    };

    let on_save_comment = move |draft: String| {
        let Some(imo) = editing() else {
            return;
        };
        let cfg = config();
        let mut saving = saving;
        let mut comment_error = comment_error;
        saving.set(true);
        comment_error.set(None);
        spawn(async move {
            let mut fleet = fleet;
            let mut editing = editing;
            let mut saving = saving;
            let mut comment_error = comment_error;
            let result = match FleetClient::from_config(&cfg) {
                Ok(client) => client.update_comments(&imo, &draft).await,
                Err(err) => Err(err),
            };
            saving.set(false);
            match result {
                Ok(echoed) => {
                    let stored = echoed.and_then(|record| record.comments).or(Some(draft));
                    fleet.with_mut(|s| s.apply_comment(&imo, stored));
                    editing.set(None);
                    push_toast(toasts, ToastKind::Success, "Comment saved.");
                }
                Err(err) => {
                    tracing::warn!(imo = %imo, error = %err, "comment update failed");
                    comment_error.set(Some(err.to_string()));
                    push_toast(toasts, ToastKind::Error, format!("Failed to save comment: {err}"));
                }
            }
        });
    };

    rsx! {
        div {
            class: "page",
            div {
                class: "page__header",
                h1 { "Fleet Dashboard" }
                button {
                    class: "{theme::btn_primary()}",
                    disabled: state.loading,
                    onclick: move |_| triggers.reload_fleet(),
                    if state.loading { "Refreshing…" } else { "Refresh" }
                }
            }

            if let Some(error) = state.error.clone() {
                div {
                    class: "banner banner--error",
                    role: "alert",
                    span { "Could not load vessel data: {error}" }
                    button {
                        class: "{theme::btn_ghost()}",
                        onclick: move |_| triggers.reload_fleet(),
                        "Retry"
                    }
                }
            }

            div {
                class: "kpi-grid",
                KpiCard {
                    title: "Vessels".to_string(),
                    value: count_label,
                    description: Some(format!("{high_risk} high risk")),
                    alert: high_risk > 0,
                }
                KpiCard {
                    title: "Last Updated".to_string(),
                    value: last_updated,
                }
            }

            div {
                class: "chart-grid",
                BarChart {
                    title: "Vessels by Port".to_string(),
                    points: by_port,
                }
                BarChart {
                    title: "Arrival in (Days)".to_string(),
                    points: timeline.buckets.clone(),
                    footnote: undated,
                }
            }

            FilterBar { filters, options, config: settings.filters.clone() }

            if state.loading && state.vessels.is_empty() {
                div { class: "{theme::panel()} placeholder", "Loading fleet data…" }
            } else if no_results {
                div {
                    class: "{theme::panel()} placeholder",
                    p { "No vessels match the current filters." }
                    button {
                        class: "{theme::btn_ghost()}",
                        onclick: move |_| filters.with_mut(FilterState::reset),
                        "Reset filters"
                    }
                }
            } else {
                VesselTable {
                    vessels: visible,
                    pending,
                    config: settings.table.clone(),
                    on_checklist,
                    on_comment: move |imo: String| {
                        let mut comment_error = comment_error;
                        comment_error.set(None);
                        editing.set(Some(imo));
                    },
                }
            }

            if let Some((imo, name, initial)) = edit_target {
                CommentEditor {
                    key: "{imo}",
                    vessel_name: name,
                    imo: imo.clone(),
                    initial,
                    saving: saving(),
                    error: comment_error(),
                    on_save: on_save_comment,
                    on_close: move |_| editing.set(None),
                }
            }
        }
    }
}
