//! Row/column model and view state for the data tables.
//!
//! The rendering lives in `ui::components::data_table`; everything here is
//! plain data and pure functions so the sort, expansion and virtualization
//! rules can be tested without a renderer.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Date(OffsetDateTime),
    Flag(bool),
}

impl CellValue {
    pub fn text(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => CellValue::Text(v.to_string()),
            _ => CellValue::Empty,
        }
    }

    pub fn number(value: Option<f64>) -> Self {
        value
            .filter(|v| v.is_finite())
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty)
    }

    pub fn date(value: Option<OffsetDateTime>) -> Self {
        value.map(CellValue::Date).unwrap_or(CellValue::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Groups cells of different kinds in one column: numbers, flags,
    /// dates, text, then empty.
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Number(_) => 0,
            CellValue::Flag(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Empty => 4,
        }
    }
}

/// How a column's cells are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    DateTime,
    Date,
    Decimal(u8),
    /// Coloured pill for a vessel's event type.
    Status,
    /// Badge coloured by risk band.
    Risk,
    /// Toggle for the 5-day checklist flag.
    Checklist,
    /// Red/yellow alert counter; the cell holds "red:yellow".
    Alerts,
    /// Pill for a defect's normalised status.
    DefectStatus,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub width: Option<&'static str>,
    pub min_width: Option<&'static str>,
    pub kind: ColumnKind,
    pub sortable: bool,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            width: None,
            min_width: None,
            kind: ColumnKind::Text,
            sortable: true,
        }
    }

    pub const fn width(mut self, width: &'static str) -> Self {
        self.width = Some(width);
        self
    }

    pub const fn min_width(mut self, min_width: &'static str) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub const fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

/// True when no two columns share a key.
pub fn columns_are_unique(columns: &[Column]) -> bool {
    let mut seen = HashSet::new();
    columns.iter().all(|column| seen.insert(column.key))
}

#[derive(Clone, Debug, PartialEq)]
pub struct DetailItem {
    pub label: &'static str,
    pub value: CellValue,
    pub kind: ColumnKind,
}

/// Trailing per-row action (e.g. the comments preview).
#[derive(Clone, Debug, PartialEq)]
pub struct RowAction {
    pub label: String,
    pub preview: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionColumn {
    pub label: &'static str,
    pub width: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub cells: BTreeMap<&'static str, CellValue>,
    pub details: Vec<DetailItem>,
    pub action: Option<RowAction>,
    /// A mutation for this row is in flight.
    pub busy: bool,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: BTreeMap::new(),
            details: Vec::new(),
            action: None,
            busy: false,
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.insert(key, value);
        self
    }

    pub fn detail(mut self, label: &'static str, value: CellValue, kind: ColumnKind) -> Self {
        self.details.push(DetailItem { label, value, kind });
        self
    }

    pub fn value(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&CellValue::Empty)
    }
}

/// Records that can be shown in a [`TableRow`].
pub trait TableRecord {
    fn row_id(&self) -> String;
    fn to_row(&self) -> TableRow;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: Option<&str>, direction: SortDirection) -> Self {
        Self {
            key: key.map(str::to_string),
            direction,
        }
    }

    /// Header click: the active column flips direction, any other column
    /// becomes active in ascending order.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }
}

/// Orders two cells. Empty cells go last in both directions; the direction
/// only flips comparisons between defined values.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    let raw = match (a, b) {
        (CellValue::Empty, CellValue::Empty) => return Ordering::Equal,
        (CellValue::Empty, _) => return Ordering::Greater,
        (_, CellValue::Empty) => return Ordering::Less,
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Flag(x), CellValue::Flag(y)) => x.cmp(y),
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => compare_text(x, y),
        (x, y) => x.kind_rank().cmp(&y.kind_rank()),
    };

    match direction {
        SortDirection::Ascending => raw,
        SortDirection::Descending => raw.reverse(),
    }
}

/// Case-insensitive first so "alpha" and "Bravo" interleave the way a
/// locale collation would, then code points to keep the order total.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Stable sort by the active column; no active column keeps input order.
pub fn sort_rows(rows: &mut [TableRow], sort: &SortState) {
    let Some(key) = sort.key.as_deref() else {
        return;
    };
    rows.sort_by(|a, b| compare_cells(a.value(key), b.value(key), sort.direction));
}

/// Expanded row ids. Survives data refreshes; only a remount clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Behaviour switches for the one parameterised data table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub virtualize: bool,
    pub row_height: f64,
    pub virtualize_threshold: usize,
    /// Extra rows rendered above and below the viewport.
    pub overscan: usize,
    pub show_scroll_shadows: bool,
    pub show_horizontal_scroller: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            virtualize: true,
            row_height: 36.0,
            virtualize_threshold: 100,
            overscan: 20,
            show_scroll_shadows: true,
            show_horizontal_scroller: true,
        }
    }
}

/// Slice of rows to render plus the spacer heights that keep the scrollbar
/// proportional to the full row count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualWindow {
    pub start: usize,
    pub end: usize,
    pub top_spacer: f64,
    pub bottom_spacer: f64,
}

impl VirtualWindow {
    pub fn all(total: usize) -> Self {
        Self {
            start: 0,
            end: total,
            top_spacer: 0.0,
            bottom_spacer: 0.0,
        }
    }

    pub fn compute(
        total: usize,
        scroll_top: f64,
        viewport_height: f64,
        config: &TableConfig,
    ) -> Self {
        let row_height = config.row_height;
        if !config.virtualize
            || total <= config.virtualize_threshold
            || !(row_height.is_finite() && row_height > 0.0)
        {
            return Self::all(total);
        }

        let first_visible = (scroll_top.max(0.0) / row_height).floor() as usize;
        let start = first_visible.saturating_sub(config.overscan).min(total);
        let visible_rows = (viewport_height.max(0.0) / row_height).ceil() as usize;
        let end = (start + visible_rows + config.overscan * 2).min(total);

        Self {
            start,
            end,
            top_spacer: start as f64 * row_height,
            bottom_spacer: (total - end) as f64 * row_height,
        }
    }

    /// Detail rows have no fixed height, so the spacer maths only holds
    /// while none of the table's rows is expanded.
    pub fn for_table(
        total: usize,
        expanded_rows: usize,
        scroll_top: f64,
        viewport_height: f64,
        config: &TableConfig,
    ) -> Self {
        if expanded_rows > 0 {
            return Self::all(total);
        }
        Self::compute(total, scroll_top, viewport_height, config)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Scroll position and extents of the table wrapper, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollShadows {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl ScrollMetrics {
    fn max_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    fn max_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn needs_horizontal_scroll(&self) -> bool {
        self.max_left() > 0.5
    }

    /// Position of the auxiliary scroller, 0-100.
    pub fn horizontal_percent(&self) -> f64 {
        if !self.needs_horizontal_scroll() {
            return 0.0;
        }
        (self.scroll_left / self.max_left() * 100.0).clamp(0.0, 100.0)
    }

    /// Native offset matching a scroller position.
    pub fn scroll_left_for_percent(&self, percent: f64) -> f64 {
        if !percent.is_finite() {
            return 0.0;
        }
        self.max_left() * percent.clamp(0.0, 100.0) / 100.0
    }

    pub fn shadows(&self) -> ScrollShadows {
        ScrollShadows {
            left: self.scroll_left > 0.5,
            right: self.scroll_left + 0.5 < self.max_left(),
            top: self.scroll_top > 0.5,
            bottom: self.scroll_top + 0.5 < self.max_top(),
        }
    }
}
