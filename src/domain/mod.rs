//! Fleet domain: records, derived fields, the filter pipeline and table state.

pub mod aggregate;
pub mod app_state;
pub mod clock;
pub mod defect;
pub mod filter;
pub mod table;
pub mod vessel;

#[allow(unused_imports)]
pub use aggregate::{
    arrival_timeline, count_by_port, distribution, distribution_over, high_risk_count,
    top_categories, ArrivalBucket, ArrivalTimeline, ChartPoint,
};
#[allow(unused_imports)]
pub use app_state::{DefectsState, FleetState};
#[allow(unused_imports)]
pub use clock::{Clock, ClockHandle};
#[allow(unused_imports)]
pub use defect::{search_defects, DefectRecord, DefectStatus, CRITICALITY_CATEGORIES, STATUS_CATEGORIES};
#[allow(unused_imports)]
pub use filter::{
    apply_filters, dedupe_latest, prepare_fleet, unique_values, FilterBarConfig, FilterState,
    Selection, VoyageFilter,
};
#[allow(unused_imports)]
pub use table::{
    sort_rows, ActionColumn, CellValue, Column, ColumnKind, ExpansionState, RowAction,
    ScrollMetrics, SortDirection, SortState, TableConfig, TableRecord, TableRow, VirtualWindow,
};
#[allow(unused_imports)]
pub use vessel::{Vessel, VesselField, VesselRecord};
