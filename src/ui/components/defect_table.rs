use dioxus::prelude::*;

use super::data_table::DataTable;
use crate::domain::{
    vessel::parse_timestamp, CellValue, Column, ColumnKind, DefectRecord, SortDirection, SortState,
    TableConfig, TableRecord, TableRow,
};

pub fn defect_columns() -> Vec<Column> {
    vec![
        Column::new("vessel_name", "Vessel").min_width("150px"),
        Column::new("equipment", "Equipment").min_width("140px"),
        Column::new("description", "Description").min_width("240px"),
        Column::new("criticality", "Criticality").width("110px"),
        Column::new("status", "Status").kind(ColumnKind::DefectStatus).width("120px"),
        Column::new("reported_date", "Reported").kind(ColumnKind::Date).width("120px"),
    ]
}

impl TableRecord for DefectRecord {
    fn row_id(&self) -> String {
        self.id.clone()
    }

    fn to_row(&self) -> TableRow {
        let status = self.normalized_status();
        TableRow::new(self.row_id())
            .cell("vessel_name", CellValue::text(self.vessel_name.as_deref()))
            .cell("equipment", CellValue::text(self.equipment.as_deref()))
            .cell("description", CellValue::text(self.description.as_deref()))
            .cell("criticality", CellValue::text(self.criticality.as_deref()))
            .cell("status", CellValue::Text(status.label().to_string()))
            .cell(
                "reported_date",
                CellValue::date(self.reported_date.as_deref().and_then(parse_timestamp)),
            )
            .detail("Description", CellValue::text(self.description.as_deref()), ColumnKind::Text)
            .detail("Action Planned", CellValue::text(self.action_planned.as_deref()), ColumnKind::Text)
            .detail("Comments", CellValue::text(self.comments.as_deref()), ColumnKind::Text)
    }
}

#[component]
pub fn DefectTable(defects: Vec<DefectRecord>, #[props(default)] config: TableConfig) -> Element {
    let rows: Vec<TableRow> = defects.iter().map(TableRecord::to_row).collect();

    rsx! {
        DataTable {
            rows,
            columns: defect_columns(),
            expandable: true,
            default_sort: SortState::new(Some("reported_date"), SortDirection::Descending),
            empty_message: "No defects found".to_string(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::columns_are_unique;

    #[test]
    fn status_is_normalised_for_display() {
        let defect = DefectRecord {
            id: "d-1".into(),
            status: Some(" in progress ".into()),
            reported_date: Some("2024-12-30".into()),
            ..DefectRecord::default()
        };
        let row = defect.to_row();
        assert_eq!(row.value("status"), &CellValue::Text("IN PROGRESS".into()));
        assert!(matches!(row.value("reported_date"), CellValue::Date(_)));
        assert_eq!(row.value("equipment"), &CellValue::Empty);
        assert_eq!(row.details.len(), 3);
    }

    #[test]
    fn column_keys_are_unique() {
        assert!(columns_are_unique(&defect_columns()));
    }
}
