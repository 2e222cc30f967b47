//! Class and colour helpers shared by the pages. The classes themselves live
//! in `assets/main.css`.

use crate::domain::DefectStatus;

// ============================================
// BUTTONS / INPUTS / PANELS
// ============================================

pub fn btn_primary() -> &'static str {
    "btn btn--primary"
}

pub fn btn_ghost() -> &'static str {
    "btn btn--ghost"
}

pub fn btn_small(active: bool) -> &'static str {
    if active {
        "btn btn--small btn--active"
    } else {
        "btn btn--small"
    }
}

pub fn input_class() -> &'static str {
    "input"
}

pub fn panel() -> &'static str {
    "panel"
}

pub fn label_class() -> &'static str {
    "field-label"
}

// ============================================
// VESSEL STATUS
// ============================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    AtSea,
    InPort,
    Anchored,
    Other,
}

impl StatusTone {
    pub fn of(event_type: Option<&str>) -> Self {
        let Some(label) = event_type else {
            return StatusTone::Other;
        };
        let lower = label.to_lowercase();
        if lower.contains("at sea") || lower.contains("transit") {
            StatusTone::AtSea
        } else if lower.contains("port") || lower.contains("berth") {
            StatusTone::InPort
        } else if lower.contains("anchor") {
            StatusTone::Anchored
        } else {
            StatusTone::Other
        }
    }

    pub fn dot_class(self) -> &'static str {
        match self {
            StatusTone::AtSea => "status-dot status-dot--sea",
            StatusTone::InPort => "status-dot status-dot--port",
            StatusTone::Anchored => "status-dot status-dot--anchor",
            StatusTone::Other => "status-dot",
        }
    }
}

/// Badge variant for a risk score: under 50 is fine, under 75 needs a look.
pub fn risk_badge_class(score: Option<u8>) -> &'static str {
    match score {
        None => "badge badge--info",
        Some(s) if s < 50 => "badge badge--success",
        Some(s) if s < 75 => "badge badge--warning",
        Some(_) => "badge badge--danger",
    }
}

// ============================================
// DEFECTS
// ============================================

pub fn defect_status_class(status: DefectStatus) -> &'static str {
    match status {
        DefectStatus::Open => "pill pill--danger",
        DefectStatus::InProgress => "pill pill--warning",
        DefectStatus::Closed => "pill pill--success",
        DefectStatus::Unknown => "pill",
    }
}

// ============================================
// CHARTS
// ============================================

pub const CHART_PALETTE: [&str; 5] = ["#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8"];

pub fn palette_color(index: usize) -> &'static str {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

/// Fixed colours for known categories, palette fallback otherwise.
pub fn category_color(label: &str, index: usize) -> &'static str {
    match label {
        "OPEN" => "#FF8042",
        "IN PROGRESS" => "#FFBB28",
        "CLOSED" => "#00C49F",
        "High" => "#FF0000",
        "Medium" => "#FFBB28",
        "Low" => "#00C49F",
        _ => palette_color(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tone_follows_event_label() {
        assert_eq!(StatusTone::of(Some("At Sea - Laden")), StatusTone::AtSea);
        assert_eq!(StatusTone::of(Some("At Berth - Gladstone")), StatusTone::InPort);
        assert_eq!(StatusTone::of(Some("Anchored off Hay Point")), StatusTone::Anchored);
        assert_eq!(StatusTone::of(None), StatusTone::Other);
    }

    #[test]
    fn risk_bands() {
        assert_eq!(risk_badge_class(Some(49)), "badge badge--success");
        assert_eq!(risk_badge_class(Some(50)), "badge badge--warning");
        assert_eq!(risk_badge_class(Some(75)), "badge badge--danger");
        assert_eq!(risk_badge_class(None), "badge badge--info");
    }

    #[test]
    fn unknown_categories_cycle_the_palette() {
        assert_eq!(category_color("CLOSED", 0), "#00C49F");
        assert_eq!(category_color("Boiler", 6), CHART_PALETTE[1]);
    }
}
