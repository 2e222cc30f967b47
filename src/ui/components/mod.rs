pub mod alert_indicator;
pub mod charts;
pub mod checklist_toggle;
pub mod comment_editor;
pub mod data_table;
pub mod defect_table;
pub mod filter_bar;
pub mod kpi_card;
pub mod risk_badge;
pub mod status_pill;
pub mod toast;
pub mod vessel_table;
