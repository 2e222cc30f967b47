//! Vessel defects as listed by the defects service.

use serde::{Deserialize, Serialize};

pub const STATUS_CATEGORIES: [&str; 3] = ["OPEN", "IN PROGRESS", "CLOSED"];
pub const CRITICALITY_CATEGORIES: [&str; 3] = ["High", "Medium", "Low"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DefectRecord {
    pub id: String,
    pub vessel_name: Option<String>,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub criticality: Option<String>,
    pub status: Option<String>,
    pub reported_date: Option<String>,
    pub action_planned: Option<String>,
    pub comments: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefectStatus {
    Open,
    InProgress,
    Closed,
    Unknown,
}

impl DefectStatus {
    /// Upper-cased and trimmed before matching, so "in progress " is
    /// `InProgress`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_uppercase()).as_deref() {
            Some("OPEN") => DefectStatus::Open,
            Some("IN PROGRESS") => DefectStatus::InProgress,
            Some("CLOSED") => DefectStatus::Closed,
            _ => DefectStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DefectStatus::Open => "OPEN",
            DefectStatus::InProgress => "IN PROGRESS",
            DefectStatus::Closed => "CLOSED",
            DefectStatus::Unknown => "UNKNOWN",
        }
    }
}

impl DefectRecord {
    pub fn normalized_status(&self) -> DefectStatus {
        DefectStatus::parse(self.status.as_deref())
    }

    fn searchable(&self) -> [Option<&str>; 9] {
        [
            Some(self.id.as_str()),
            self.vessel_name.as_deref(),
            self.equipment.as_deref(),
            self.description.as_deref(),
            self.criticality.as_deref(),
            self.status.as_deref(),
            self.reported_date.as_deref(),
            self.action_planned.as_deref(),
            self.comments.as_deref(),
        ]
    }

    /// Case-insensitive substring match over every field.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.searchable()
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

pub fn search_defects(defects: &[DefectRecord], query: &str) -> Vec<DefectRecord> {
    defects
        .iter()
        .filter(|defect| defect.matches(query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defect(id: &str) -> DefectRecord {
        DefectRecord {
            id: id.into(),
            ..DefectRecord::default()
        }
    }

    #[test]
    fn status_is_normalised() {
        assert_eq!(DefectStatus::parse(Some(" in progress ")), DefectStatus::InProgress);
        assert_eq!(DefectStatus::parse(Some("Closed")), DefectStatus::Closed);
        assert_eq!(DefectStatus::parse(Some("deferred")), DefectStatus::Unknown);
        assert_eq!(DefectStatus::parse(None).label(), "UNKNOWN");
    }

    #[test]
    fn search_covers_every_field() {
        let defects = vec![
            DefectRecord {
                action_planned: Some("Replace gasket at next port".into()),
                ..defect("d-1")
            },
            DefectRecord {
                equipment: Some("Main Engine".into()),
                ..defect("d-2")
            },
        ];
        let hits = search_defects(&defects, "GASKET");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d-1");
        assert_eq!(search_defects(&defects, "d-2")[0].id, "d-2");
        assert_eq!(search_defects(&defects, "  ").len(), 2);
    }
}
