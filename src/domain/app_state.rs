use std::{collections::HashSet, fmt::Display};

use time::OffsetDateTime;

use super::{
    defect::DefectRecord,
    filter::prepare_fleet,
    vessel::{Vessel, VesselRecord},
};

/// Monotonic request counter. Only the completion carrying the latest
/// ticket may touch state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

/// Base dataset of the fleet view plus fetch and mutation bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct FleetState {
    pub vessels: Vec<Vessel>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<OffsetDateTime>,
    requests: RequestSeq,
    pending_checklist: HashSet<String>,
}

impl FleetState {
    pub fn begin_fetch(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.requests.next()
    }

    /// Applies a fetch result. Returns `false` when the ticket was
    /// superseded and the result was dropped.
    pub fn finish_fetch<E: Display>(
        &mut self,
        ticket: u64,
        result: Result<Vec<VesselRecord>, E>,
        now: OffsetDateTime,
    ) -> bool {
        if !self.requests.is_current(ticket) {
            tracing::debug!(ticket, "discarding superseded fleet response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(raw) => {
                self.vessels = prepare_fleet(&raw, now);
                self.last_updated = Some(now);
                self.error = None;
                tracing::info!(
                    received = raw.len(),
                    kept = self.vessels.len(),
                    "fleet dataset refreshed"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "fleet fetch failed");
                self.vessels.clear();
                self.error = Some(err.to_string());
            }
        }
        true
    }

    pub fn vessel(&self, imo: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.imo() == imo)
    }

    fn vessel_mut(&mut self, imo: &str) -> Option<&mut Vessel> {
        self.vessels.iter_mut().find(|v| v.imo() == imo)
    }

    pub fn is_checklist_pending(&self, imo: &str) -> bool {
        self.pending_checklist.contains(imo)
    }

    /// Marks a checklist update as in flight. `false` if one already is.
    pub fn begin_checklist_update(&mut self, imo: &str) -> bool {
        self.pending_checklist.insert(imo.to_string())
    }

    /// Applies the server-confirmed flag. On failure the stored value is
    /// left as it was.
    pub fn finish_checklist_update<E: Display>(
        &mut self,
        imo: &str,
        result: Result<bool, E>,
    ) -> Result<(), String> {
        self.pending_checklist.remove(imo);
        match result {
            Ok(received) => {
                if let Some(vessel) = self.vessel_mut(imo) {
                    vessel.record.checklist_received = received;
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!(imo, error = %err, "checklist update failed");
                Err(err.to_string())
            }
        }
    }

    pub fn apply_comment(&mut self, imo: &str, comments: Option<String>) {
        if let Some(vessel) = self.vessel_mut(imo) {
            vessel.record.comments = comments.filter(|c| !c.trim().is_empty());
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DefectsState {
    pub defects: Vec<DefectRecord>,
    pub loading: bool,
    pub error: Option<String>,
    requests: RequestSeq,
}

impl DefectsState {
    pub fn begin_fetch(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.requests.next()
    }

    pub fn finish_fetch<E: Display>(&mut self, ticket: u64, result: Result<Vec<DefectRecord>, E>) -> bool {
        if !self.requests.is_current(ticket) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(defects) => {
                tracing::info!(count = defects.len(), "defects loaded");
                self.defects = defects;
            }
            Err(err) => {
                tracing::warn!(error = %err, "defect fetch failed");
                self.defects.clear();
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-01-10 08:00 UTC);

    fn raw(imo: &str) -> VesselRecord {
        VesselRecord {
            imo_no: imo.into(),
            event_type: Some("In Port".into()),
            dwh_load_date: Some("2025-01-10".into()),
            ..VesselRecord::default()
        }
    }

    fn loaded() -> FleetState {
        let mut state = FleetState::default();
        let ticket = state.begin_fetch();
        assert!(state.finish_fetch::<String>(ticket, Ok(vec![raw("9877872")]), NOW));
        state
    }

    #[test]
    fn successful_fetch_replaces_dataset() {
        let state = loaded();
        assert!(!state.loading);
        assert_eq!(state.vessels.len(), 1);
        assert_eq!(state.last_updated, Some(NOW));
    }

    #[test]
    fn superseded_fetch_is_ignored() {
        let mut state = FleetState::default();
        let stale = state.begin_fetch();
        let fresh = state.begin_fetch();
        assert!(state.finish_fetch::<String>(fresh, Ok(vec![raw("1"), raw("2")]), NOW));
        assert!(!state.finish_fetch::<String>(stale, Ok(vec![raw("3")]), NOW));
        assert_eq!(state.vessels.len(), 2);
    }

    #[test]
    fn failed_fetch_clears_dataset_and_reports() {
        let mut state = loaded();
        let ticket = state.begin_fetch();
        state.finish_fetch(ticket, Err("HTTP 502"), NOW);
        assert!(state.vessels.is_empty());
        assert_eq!(state.error.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn failed_checklist_update_keeps_previous_value() {
        let mut state = loaded();
        assert!(state.begin_checklist_update("9877872"));
        assert!(!state.begin_checklist_update("9877872"));
        assert!(state.is_checklist_pending("9877872"));

        let outcome = state.finish_checklist_update("9877872", Err("server returned 500"));
        assert_eq!(outcome, Err("server returned 500".to_string()));
        assert!(!state.is_checklist_pending("9877872"));
        assert!(!state.vessel("9877872").map(|v| v.record.checklist_received).unwrap_or(true));
    }

    #[test]
    fn confirmed_checklist_update_is_applied() {
        let mut state = loaded();
        state.begin_checklist_update("9877872");
        assert_eq!(state.finish_checklist_update::<String>("9877872", Ok(true)), Ok(()));
        assert!(state.vessel("9877872").is_some_and(|v| v.record.checklist_received));
    }

    #[test]
    fn blank_comment_clears_it() {
        let mut state = loaded();
        state.apply_comment("9877872", Some("Pilot booked 0600".into()));
        assert_eq!(
            state.vessel("9877872").and_then(|v| v.record.comments.as_deref()),
            Some("Pilot booked 0600")
        );
        state.apply_comment("9877872", Some("   ".into()));
        assert_eq!(state.vessel("9877872").and_then(|v| v.record.comments.clone()), None);
    }

    #[test]
    fn defect_fetch_honours_tickets() {
        let mut state = DefectsState::default();
        let first = state.begin_fetch();
        let second = state.begin_fetch();
        assert!(!state.finish_fetch::<String>(first, Ok(vec![DefectRecord::default()])));
        assert!(state.loading);
        assert!(state.finish_fetch(second, Err("timeout")));
        assert_eq!(state.error.as_deref(), Some("timeout"));
    }
}
