//! Binds the generic data table to fleet vessels.

use dioxus::prelude::*;

use super::data_table::DataTable;
use crate::domain::{
    vessel::parse_timestamp, ActionColumn, CellValue, Column, ColumnKind, RowAction, SortDirection,
    SortState, TableConfig, TableRecord, TableRow, Vessel,
};

/// Characters of the comment shown in the action column.
pub const COMMENT_PREVIEW_CHARS: usize = 40;

pub fn vessel_columns() -> Vec<Column> {
    vec![
        Column::new("vessel_name", "Vessel").min_width("160px"),
        Column::new("imo_no", "IMO No").width("100px"),
        Column::new("owner", "Owner").min_width("140px"),
        Column::new("event_type", "Event Type").kind(ColumnKind::Status).min_width("150px"),
        Column::new("departure_port", "Departure Port").min_width("130px"),
        Column::new("departure_date", "Departure Date").kind(ColumnKind::DateTime).width("150px"),
        Column::new("arrival_port", "Arrival Port").min_width("130px"),
        Column::new("arrival_country", "Arrival Country").min_width("120px"),
        Column::new("eta", "ETA").kind(ColumnKind::DateTime).width("150px"),
        Column::new("etb", "ETB").kind(ColumnKind::DateTime).width("150px"),
        Column::new("days_to_go", "Days to Go").kind(ColumnKind::Decimal(1)).width("100px"),
        Column::new("risk_score", "Risk").kind(ColumnKind::Risk).width("80px"),
        Column::new("alerts", "Alerts").kind(ColumnKind::Alerts).width("90px"),
        Column::new("checklist_received", "5-day Checklist Received")
            .kind(ColumnKind::Checklist)
            .width("120px"),
    ]
}

/// Labels of the expandable detail row, in display order.
pub fn vessel_detail_fields() -> [&'static str; 9] {
    [
        "Departure Country",
        "ETD",
        "ATD",
        "Last Report",
        "Last PSC Inspection",
        "PSC Port",
        "Last AMSA Inspection",
        "AMSA Port",
        "Distance to Go (nm)",
    ]
}

pub fn comments_column() -> ActionColumn {
    ActionColumn {
        label: "Comments",
        width: "220px",
    }
}

pub fn default_vessel_sort() -> SortState {
    SortState::new(Some("eta"), SortDirection::Descending)
}

fn timestamp(raw: Option<&str>) -> CellValue {
    CellValue::date(raw.and_then(parse_timestamp))
}

/// "Add comment" when there is none, otherwise a short preview to open.
pub fn comment_action(comments: Option<&str>) -> RowAction {
    match comments.map(str::trim).filter(|c| !c.is_empty()) {
        None => RowAction {
            label: "Add comment".into(),
            preview: None,
        },
        Some(text) => {
            let mut preview: String = text.chars().take(COMMENT_PREVIEW_CHARS).collect();
            if text.chars().count() > COMMENT_PREVIEW_CHARS {
                preview.push('…');
            }
            RowAction {
                label: "View/Edit".into(),
                preview: Some(preview),
            }
        }
    }
}

impl TableRecord for Vessel {
    fn row_id(&self) -> String {
        self.imo().to_string()
    }

    fn to_row(&self) -> TableRow {
        let r = &self.record;
        let alerts = format!("{}:{}", r.alerts_red.unwrap_or(0), r.alerts_yellow.unwrap_or(0));
        let [departure_country, etd, atd, last_report, psc_date, psc_port, amsa_date, amsa_port, distance] =
            vessel_detail_fields();

        let mut row = TableRow::new(self.row_id())
            .cell("vessel_name", CellValue::text(r.vessel_name.as_deref()))
            .cell("imo_no", CellValue::text(Some(&r.imo_no)))
            .cell("owner", CellValue::text(r.owner.as_deref()))
            .cell("event_type", CellValue::text(r.event_type.as_deref()))
            .cell("departure_port", CellValue::text(r.departure_port.as_deref()))
            .cell("departure_date", timestamp(r.departure_date.as_deref()))
            .cell("arrival_port", CellValue::text(r.arrival_port.as_deref()))
            .cell("arrival_country", CellValue::text(r.arrival_country.as_deref()))
            .cell("eta", CellValue::date(self.eta))
            .cell("etb", timestamp(r.etb.as_deref()))
            .cell("days_to_go", CellValue::Number(self.days_to_go))
            .cell("risk_score", CellValue::Number(f64::from(self.risk_score)))
            .cell("alerts", CellValue::Text(alerts))
            .cell("checklist_received", CellValue::Flag(r.checklist_received))
            .detail(departure_country, CellValue::text(r.departure_country.as_deref()), ColumnKind::Text)
            .detail(etd, timestamp(r.etd.as_deref()), ColumnKind::DateTime)
            .detail(atd, timestamp(r.atd.as_deref()), ColumnKind::DateTime)
            .detail(last_report, timestamp(r.report_date.as_deref()), ColumnKind::DateTime)
            .detail(psc_date, timestamp(r.psc_last_inspection_date.as_deref()), ColumnKind::Date)
            .detail(psc_port, CellValue::text(r.psc_last_inspection_port.as_deref()), ColumnKind::Text)
            .detail(amsa_date, timestamp(r.amsa_last_inspection_date.as_deref()), ColumnKind::Date)
            .detail(amsa_port, CellValue::text(r.amsa_last_inspection_port.as_deref()), ColumnKind::Text)
            .detail(distance, CellValue::number(r.distance_to_go), ColumnKind::Decimal(0));
        row.action = Some(comment_action(r.comments.as_deref()));
        row
    }
}

#[component]
pub fn VesselTable(
    vessels: Vec<Vessel>,
    pending: Vec<String>,
    #[props(default)] config: TableConfig,
    on_checklist: EventHandler<(String, bool)>,
    on_comment: EventHandler<String>,
) -> Element {
    let rows: Vec<TableRow> = vessels
        .iter()
        .map(|vessel| {
            let mut row = vessel.to_row();
            row.busy = pending.iter().any(|imo| imo == vessel.imo());
            row
        })
        .collect();

    rsx! {
        DataTable {
            rows,
            columns: vessel_columns(),
            expandable: true,
            action_column: Some(comments_column()),
            default_sort: default_vessel_sort(),
            empty_message: "No vessels match the current filters".to_string(),
            config,
            on_toggle: on_checklist,
            on_action: on_comment,
        }
    }
}
