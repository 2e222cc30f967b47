//! The one table component behind the vessel and defect views.
//!
//! Sorting, row expansion and the virtual window are local view state; the
//! table never filters and never talks to the network. Mutations leave
//! through `on_toggle` / `on_action`.

use dioxus::prelude::*;
use time::macros::format_description;
use uuid::Uuid;

use super::{
    alert_indicator::{parse_alert_counts, AlertIndicator},
    checklist_toggle::ChecklistToggle,
    risk_badge::RiskBadge,
    status_pill::{DefectStatusPill, StatusPill},
};
use crate::domain::{
    sort_rows, table::columns_are_unique, ActionColumn, CellValue, Column, ColumnKind,
    ExpansionState, ScrollMetrics, SortDirection, SortState, TableConfig, TableRow,
    VirtualWindow,
};

pub const EMPTY_PLACEHOLDER: &str = "—";

#[component]
pub fn DataTable(
    rows: Vec<TableRow>,
    columns: Vec<Column>,
    #[props(default)] expandable: bool,
    action_column: Option<ActionColumn>,
    #[props(default)] default_sort: SortState,
    #[props(default = "No data available".to_string())] empty_message: String,
    #[props(default)] config: TableConfig,
    #[props(default)] on_toggle: EventHandler<(String, bool)>,
    #[props(default)] on_action: EventHandler<String>,
) -> Element {
    let table_id = use_hook(|| format!("data-table-{}", Uuid::new_v4().simple()));
    let mut sort = use_signal(|| default_sort.clone());
    let mut expansion = use_signal(ExpansionState::default);
    let metrics = use_signal(ScrollMetrics::default);

    use_hook(|| {
        if !columns_are_unique(&columns) {
            tracing::warn!(table = %table_id, "duplicate column keys; cells will collide");
        }
    });

    let current_sort = sort();
    let mut sorted = rows;
    sort_rows(&mut sorted, &current_sort);

    let snapshot = metrics();
    let total = sorted.len();
    let expanded = expansion();
    let open_rows = sorted.iter().filter(|row| expanded.is_expanded(&row.id)).count();
    let window = VirtualWindow::for_table(
        total,
        open_rows,
        snapshot.scroll_top,
        snapshot.client_height,
        &config,
    );
    let visible: Vec<(String, bool, TableRow)> = sorted
        .drain(window.start..window.end)
        .map(|row| (row.id.clone(), expanded.is_expanded(&row.id), row))
        .collect();
    let headers: Vec<(Column, Option<SortDirection>)> = columns
        .iter()
        .map(|column| {
            let active = current_sort.is_active(column.key).then_some(current_sort.direction);
            (column.clone(), active)
        })
        .collect();

    let span = columns.len() + usize::from(expandable) + usize::from(action_column.is_some());
    let shadows = snapshot.shadows();
    let show_shadows = config.show_scroll_shadows;
    let show_scroller = config.show_horizontal_scroller && snapshot.needs_horizontal_scroll();
    let percent = snapshot.horizontal_percent();

    let mounted_id = table_id.clone();
    let scroll_id = table_id.clone();
    let resize_id = table_id.clone();
    let scroller_id = table_id.clone();

    rsx! {
        div {
            class: "data-table",
            if show_scroller {
                input {
                    class: "data-table__scroller",
                    r#type: "range",
                    min: "0",
                    max: "100",
                    step: "0.1",
                    value: "{percent:.1}",
                    aria_label: "Scroll table horizontally",
                    oninput: move |evt| {
                        let requested = evt.value().parse::<f64>().unwrap_or(0.0);
                        let left = metrics.peek().scroll_left_for_percent(requested);
                        set_scroll_left(scroller_id.clone(), left);
                    },
                }
            }
            div {
                class: "data-table__frame",
                if show_shadows && shadows.left {
                    div { class: "scroll-shadow scroll-shadow--left" }
                }
                if show_shadows && shadows.right {
                    div { class: "scroll-shadow scroll-shadow--right" }
                }
                if show_shadows && shadows.top {
                    div { class: "scroll-shadow scroll-shadow--top" }
                }
                if show_shadows && shadows.bottom {
                    div { class: "scroll-shadow scroll-shadow--bottom" }
                }
                div {
                    id: "{table_id}",
                    class: "data-table__scroll",
                    onmounted: move |_| {
                        spawn(sync_metrics(mounted_id.clone(), metrics));
                    },
                    onscroll: move |_| {
                        spawn(sync_metrics(scroll_id.clone(), metrics));
                    },
                    onresize: move |_| {
                        spawn(sync_metrics(resize_id.clone(), metrics));
                    },
                    table {
                        thead {
                            tr {
                                if expandable {
                                    th { class: "data-table__expander" }
                                }
                                for (column, active) in headers {
                                    HeaderCell {
                                        key: "{column.key}",
                                        column,
                                        active,
                                        on_sort: move |key: &'static str| sort.with_mut(|state| state.toggle(key)),
                                    }
                                }
                                if let Some(action) = action_column.as_ref() {
                                    th { class: "data-table__action", style: "width: {action.width}", "{action.label}" }
                                }
                            }
                        }
                        tbody {
                            if total == 0 {
                                tr {
                                    td { class: "data-table__empty", colspan: "{span}", "{empty_message}" }
                                }
                            }
                            if window.top_spacer > 0.0 {
                                tr {
                                    class: "data-table__spacer",
                                    style: "height: {window.top_spacer}px",
                                    td { colspan: "{span}" }
                                }
                            }
                            for (row_key, is_open, row) in visible {
                                DataRow {
                                    key: "{row_key}",
                                    row,
                                    expanded: is_open,
                                    columns: columns.clone(),
                                    expandable,
                                    span,
                                    show_action: action_column.is_some(),
                                    on_expand: move |id: String| expansion.with_mut(|state| state.toggle(&id)),
                                    on_toggle,
                                    on_action,
                                }
                            }
                            if window.bottom_spacer > 0.0 {
                                tr {
                                    class: "data-table__spacer",
                                    style: "height: {window.bottom_spacer}px",
                                    td { colspan: "{span}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HeaderCell(
    column: Column,
    active: Option<SortDirection>,
    on_sort: EventHandler<&'static str>,
) -> Element {
    let class = header_class(column.sortable, active.is_some());
    let style = column_style(&column);
    let arrow = active.map(sort_arrow);
    let key = column.key;
    let sortable = column.sortable;

    rsx! {
        th {
            class,
            style,
            onclick: move |_| {
                if sortable {
                    on_sort.call(key);
                }
            },
            "{column.label}"
            if let Some(arrow) = arrow {
                span { class: "sort-arrow", "{arrow}" }
            }
        }
    }
}

#[component]
fn DataRow(
    row: TableRow,
    columns: Vec<Column>,
    expandable: bool,
    expanded: bool,
    span: usize,
    show_action: bool,
    on_expand: EventHandler<String>,
    on_toggle: EventHandler<(String, bool)>,
    on_action: EventHandler<String>,
) -> Element {
    let expand_id = row.id.clone();
    let action_id = row.id.clone();
    let row_class = if expanded {
        "data-table__row data-table__row--expanded"
    } else {
        "data-table__row"
    };
    let expander_class = if expanded { "expander expander--open" } else { "expander" };

    rsx! {
        tr {
            class: row_class,
            if expandable {
                td {
                    class: "data-table__expander",
                    button {
                        class: expander_class,
                        aria_expanded: "{expanded}",
                        aria_label: "Toggle details",
                        onclick: move |evt| {
                            evt.stop_propagation();
                            on_expand.call(expand_id.clone());
                        },
                        "▼"
                    }
                }
            }
            for column in columns.iter() {
                td {
                    key: "{column.key}",
                    style: column_style(column),
                    {render_cell(column.kind, row.value(column.key), &row.id, row.busy, on_toggle)}
                }
            }
            if show_action {
                td {
                    class: "data-table__action",
                    if let Some(action) = row.action.clone() {
                        button {
                            class: "link-button",
                            onclick: move |evt| {
                                evt.stop_propagation();
                                on_action.call(action_id.clone());
                            },
                            if let Some(preview) = action.preview {
                                span { class: "action-preview", "{preview}" }
                            }
                            span { class: "action-label", "{action.label}" }
                        }
                    }
                }
            }
        }
        if expandable && expanded {
            tr {
                class: "data-table__details",
                td {
                    colspan: "{span}",
                    div {
                        class: "detail-grid",
                        for item in row.details.iter() {
                            div {
                                class: "detail-item",
                                span { class: "detail-item__label", "{item.label}" }
                                span {
                                    class: "detail-item__value",
                                    {render_cell(item.kind, &item.value, &row.id, row.busy, on_toggle)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_cell(
    kind: ColumnKind,
    value: &CellValue,
    row_id: &str,
    busy: bool,
    on_toggle: EventHandler<(String, bool)>,
) -> Element {
    match kind {
        ColumnKind::Status => rsx! { StatusPill { status: cell_text(value) } },
        ColumnKind::DefectStatus => rsx! { DefectStatusPill { status: cell_text(value) } },
        ColumnKind::Risk => {
            let score = match value {
                CellValue::Number(n) => Some(n.clamp(0.0, 100.0) as u8),
                _ => None,
            };
            rsx! { RiskBadge { score } }
        }
        ColumnKind::Alerts => {
            let (red, yellow) = match value {
                CellValue::Text(raw) => parse_alert_counts(raw),
                _ => (0, 0),
            };
            rsx! { AlertIndicator { red, yellow } }
        }
        ColumnKind::Checklist => {
            let checked = matches!(value, CellValue::Flag(true));
            let id = row_id.to_string();
            rsx! {
                ChecklistToggle {
                    checked,
                    busy,
                    on_toggle: move |next: bool| on_toggle.call((id.clone(), next)),
                }
            }
        }
        ColumnKind::Text | ColumnKind::DateTime | ColumnKind::Date | ColumnKind::Decimal(_) => {
            let text = format_cell(kind, value);
            let class = if value.is_empty() { "cell-text muted" } else { "cell-text" };
            rsx! { span { class, title: "{text}", "{text}" } }
        }
    }
}

fn cell_text(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(text) => Some(text.clone()),
        _ => None,
    }
}

/// Display string for plain cells. Missing values render as a dash.
pub fn format_cell(kind: ColumnKind, value: &CellValue) -> String {
    match value {
        CellValue::Empty => EMPTY_PLACEHOLDER.to_string(),
        CellValue::Text(text) => text.clone(),
        CellValue::Flag(flag) => (if *flag { "Yes" } else { "No" }).to_string(),
        CellValue::Number(number) => match kind {
            ColumnKind::Decimal(places) => format!("{:.*}", usize::from(places), number),
            _ if number.fract() == 0.0 => format!("{number:.0}"),
            _ => number.to_string(),
        },
        CellValue::Date(date) => {
            let format = match kind {
                ColumnKind::Date => format_description!("[day] [month repr:short] [year]"),
                _ => format_description!("[day] [month repr:short] [year] [hour]:[minute]"),
            };
            date.format(format)
                .unwrap_or_else(|_| EMPTY_PLACEHOLDER.to_string())
        }
    }
}

fn header_class(sortable: bool, active: bool) -> &'static str {
    match (sortable, active) {
        (false, _) => "data-table__header",
        (true, false) => "data-table__header sortable",
        (true, true) => "data-table__header sortable sorted",
    }
}

fn column_style(column: &Column) -> String {
    let mut style = String::new();
    if let Some(width) = column.width {
        style.push_str(&format!("width: {width};"));
    }
    if let Some(min_width) = column.min_width {
        style.push_str(&format!("min-width: {min_width};"));
    }
    style
}

fn sort_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

async fn sync_metrics(table_id: String, mut metrics: Signal<ScrollMetrics>) {
    let script = format!(
        r#"const el = document.getElementById("{table_id}");
        if (!el) {{ return null; }}
        return {{
            scroll_left: el.scrollLeft,
            scroll_top: el.scrollTop,
            scroll_width: el.scrollWidth,
            scroll_height: el.scrollHeight,
            client_width: el.clientWidth,
            client_height: el.clientHeight
        }};"#
    );
    match document::eval(&script).await {
        Ok(value) => {
            if let Ok(next) = serde_json::from_value::<ScrollMetrics>(value) {
                if *metrics.peek() != next {
                    metrics.set(next);
                }
            }
        }
        Err(err) => tracing::debug!(?err, "scroll metrics unavailable"),
    }
}

fn set_scroll_left(table_id: String, left: f64) {
    let script = format!(
        r#"const el = document.getElementById("{table_id}");
        if (el) {{ el.scrollLeft = {left}; }}
        return true;"#
    );
    let eval = document::eval(&script);
    spawn(async move {
        let _ = eval.await;
    });
}
