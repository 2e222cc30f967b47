//! Vessel tracking records and the fields derived from them client-side.

use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

use super::clock::days_between;

/// Average day's run used to estimate arrival when no ETA is reported.
pub const NAUTICAL_MILES_PER_DAY: f64 = 350.0;

/// Risk scores above this value count as high risk.
pub const HIGH_RISK_THRESHOLD: u8 = 70;

/// One tracking report for a vessel, as delivered by the fleet API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    /// Backend row identifier, echoed back on checklist updates.
    pub id: Option<String>,
    pub imo_no: String,
    pub vessel_name: Option<String>,
    pub owner: Option<String>,
    /// Current port-call label, e.g. "At Berth - Gladstone".
    pub event_type: Option<String>,
    /// Voyage state: "Active", "Inactive" or absent.
    pub status: Option<String>,
    pub office_doc: Option<String>,
    pub departure_port: Option<String>,
    pub departure_country: Option<String>,
    pub departure_date: Option<String>,
    pub arrival_port: Option<String>,
    pub arrival_country: Option<String>,
    pub eta: Option<String>,
    pub etb: Option<String>,
    pub etd: Option<String>,
    pub atd: Option<String>,
    pub report_date: Option<String>,
    pub dwh_load_date: Option<String>,
    pub distance_to_go: Option<f64>,
    pub comments: Option<String>,
    pub checklist_received: bool,
    pub psc_last_inspection_date: Option<String>,
    pub psc_last_inspection_port: Option<String>,
    pub amsa_last_inspection_date: Option<String>,
    pub amsa_last_inspection_port: Option<String>,
    pub open_defects: Option<u32>,
    pub alerts_red: Option<u32>,
    pub alerts_yellow: Option<u32>,
}

impl VesselRecord {
    /// Timestamp used to pick the latest report per IMO.
    pub fn load_timestamp(&self) -> Option<OffsetDateTime> {
        self.dwh_load_date
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.report_date.as_deref().and_then(parse_timestamp))
    }
}

/// A record plus the values computed for display. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Vessel {
    pub record: VesselRecord,
    pub eta: Option<OffsetDateTime>,
    pub days_to_go: f64,
    pub risk_score: u8,
    pub in_port: bool,
}

impl Vessel {
    pub fn derive(record: VesselRecord, now: OffsetDateTime) -> Self {
        let eta = record.eta.as_deref().and_then(|raw| {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                tracing::debug!(imo = %record.imo_no, eta = raw, "ignoring unparseable ETA");
            }
            parsed
        });
        let days_to_go = days_to_go(eta, record.distance_to_go, now);
        let risk_score = risk_score(&RiskInputs::from_record(&record, now));
        let in_port = is_in_port(record.event_type.as_deref());
        Self {
            record,
            eta,
            days_to_go,
            risk_score,
            in_port,
        }
    }

    pub fn imo(&self) -> &str {
        &self.record.imo_no
    }

    pub fn name(&self) -> &str {
        self.record.vessel_name.as_deref().unwrap_or("Unknown vessel")
    }

    pub fn field(&self, field: VesselField) -> Option<&str> {
        let value = match field {
            VesselField::ArrivalPort => self.record.arrival_port.as_deref(),
            VesselField::EventType => self.record.event_type.as_deref(),
            VesselField::OfficeDoc => self.record.office_doc.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_score > HIGH_RISK_THRESHOLD
    }
}

/// Categorical fields the dashboard can filter and group on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VesselField {
    ArrivalPort,
    EventType,
    OfficeDoc,
}

/// "In port" means the event label mentions a port or a berth.
pub fn is_in_port(event_type: Option<&str>) -> bool {
    event_type
        .map(|label| {
            let lower = label.to_lowercase();
            lower.contains("port") || lower.contains("berth")
        })
        .unwrap_or(false)
}

pub fn days_to_go(eta: Option<OffsetDateTime>, distance_nm: Option<f64>, now: OffsetDateTime) -> f64 {
    match (eta, distance_nm) {
        (Some(eta), _) => round_one(days_between(now, eta)).max(0.0),
        (None, Some(distance)) if distance.is_finite() && distance > 0.0 => {
            round_one(distance / NAUTICAL_MILES_PER_DAY)
        }
        _ => 0.0,
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Parses the timestamp shapes the tracking API emits. Naive values are
/// read as UTC; anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }

    let naive_formats = [
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ];
    for format in naive_formats {
        if let Ok(parsed) = PrimitiveDateTime::parse(value, format) {
            return Some(parsed.assume_utc());
        }
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Inputs of the risk score. Everything is optional; unknown history is
/// scored as stale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RiskInputs {
    pub days_since_psc: Option<f64>,
    pub days_since_amsa: Option<f64>,
    pub open_defects: u32,
    pub alerts_red: u32,
    pub alerts_yellow: u32,
}

impl RiskInputs {
    pub fn from_record(record: &VesselRecord, now: OffsetDateTime) -> Self {
        let since = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(parse_timestamp)
                .map(|date| days_between(date, now).max(0.0))
        };
        Self {
            days_since_psc: since(&record.psc_last_inspection_date),
            days_since_amsa: since(&record.amsa_last_inspection_date),
            open_defects: record.open_defects.unwrap_or(0),
            alerts_red: record.alerts_red.unwrap_or(0),
            alerts_yellow: record.alerts_yellow.unwrap_or(0),
        }
    }
}

/// Deterministic 0-100 score: inspection staleness (PSC up to 30, AMSA up to
/// 20), open defects (8 each, up to 30) and active alerts (up to 20).
pub fn risk_score(inputs: &RiskInputs) -> u8 {
    let psc = match inputs.days_since_psc {
        Some(days) if days < 180.0 => 0,
        Some(days) if days < 365.0 => 10,
        Some(days) if days < 730.0 => 20,
        _ => 30,
    };
    let amsa = match inputs.days_since_amsa {
        Some(days) if days < 180.0 => 0,
        Some(days) if days < 365.0 => 5,
        Some(days) if days < 730.0 => 10,
        _ => 20,
    };
    let defects = inputs.open_defects.saturating_mul(8).min(30);
    let alerts = inputs
        .alerts_red
        .saturating_mul(10)
        .saturating_add(inputs.alerts_yellow.saturating_mul(3))
        .min(20);

    (psc + amsa + defects + alerts).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(imo: &str) -> VesselRecord {
        VesselRecord {
            imo_no: imo.to_string(),
            ..VesselRecord::default()
        }
    }

    #[test]
    fn berth_label_counts_as_in_port() {
        assert!(is_in_port(Some("At Berth - Gladstone")));
        assert!(is_in_port(Some("IN PORT")));
        assert!(!is_in_port(Some("At Sea")));
        assert!(!is_in_port(None));
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert_eq!(
            parse_timestamp("2025-01-03T10:00:00Z"),
            Some(datetime!(2025-01-03 10:00 UTC))
        );
        assert_eq!(
            parse_timestamp("2025-01-03 10:00:00.250"),
            Some(datetime!(2025-01-03 10:00:00.25 UTC))
        );
        assert_eq!(
            parse_timestamp("2025-01-03"),
            Some(datetime!(2025-01-03 00:00 UTC))
        );
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("   "), None);
    }

    #[test]
    fn days_to_go_rounds_and_clamps() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let eta = datetime!(2025-01-02 12:00 UTC);
        assert_eq!(days_to_go(Some(eta), None, now), 1.5);

        let past = datetime!(2024-12-30 00:00 UTC);
        assert_eq!(days_to_go(Some(past), Some(700.0), now), 0.0);
    }

    #[test]
    fn days_to_go_falls_back_to_distance() {
        let now = datetime!(2025-01-01 00:00 UTC);
        assert_eq!(days_to_go(None, Some(875.0), now), 2.5);
        assert_eq!(days_to_go(None, None, now), 0.0);
    }

    #[test]
    fn unparseable_eta_is_treated_as_missing() {
        let now = datetime!(2025-01-01 00:00 UTC);
        let vessel = Vessel::derive(
            VesselRecord {
                eta: Some("soon".into()),
                distance_to_go: Some(350.0),
                ..record("9877872")
            },
            now,
        );
        assert_eq!(vessel.eta, None);
        assert_eq!(vessel.days_to_go, 1.0);
    }

    #[test]
    fn risk_score_is_deterministic() {
        let now = datetime!(2025-06-01 00:00 UTC);
        let vessel = VesselRecord {
            psc_last_inspection_date: Some("2025-03-01".into()),
            amsa_last_inspection_date: Some("2024-01-01".into()),
            open_defects: Some(2),
            alerts_red: Some(1),
            ..record("1")
        };
        let first = Vessel::derive(vessel.clone(), now);
        let second = Vessel::derive(vessel, now);
        assert_eq!(first.risk_score, second.risk_score);
        // psc 0 + amsa 10 + defects 16 + alerts 10
        assert_eq!(first.risk_score, 36);
    }

    #[test]
    fn unknown_history_scores_as_stale() {
        assert_eq!(risk_score(&RiskInputs::default()), 50);
        let worst = RiskInputs {
            open_defects: 10,
            alerts_red: 5,
            ..RiskInputs::default()
        };
        assert_eq!(risk_score(&worst), 100);
    }

    #[test]
    fn load_timestamp_prefers_load_date() {
        let vessel = VesselRecord {
            report_date: Some("2025-01-05".into()),
            dwh_load_date: Some("2025-01-02".into()),
            ..record("1")
        };
        assert_eq!(vessel.load_timestamp(), Some(datetime!(2025-01-02 00:00 UTC)));

        let fallback = VesselRecord {
            report_date: Some("2025-01-05".into()),
            ..record("1")
        };
        assert_eq!(fallback.load_timestamp(), Some(datetime!(2025-01-05 00:00 UTC)));
    }
}
