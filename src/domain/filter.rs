//! Filter pipeline for the fleet view: dedupe, derive, business rule, then
//! the operator's own filters. Every stage returns a new collection.

use std::{
    cmp::Ordering,
    collections::{hash_map::Entry, BTreeSet, HashMap},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    clock::start_of_day,
    vessel::{Vessel, VesselField, VesselRecord},
};

/// Multi-select state. `Only` with an empty set means nothing is selected,
/// which still lets records without a value through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    All,
    Only(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: Ord + Clone> Selection<T> {
    pub fn none() -> Self {
        Selection::Only(BTreeSet::new())
    }

    pub fn contains(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    /// Flips one value. Deselecting from `All` materialises the remaining
    /// options; a full set collapses back to `All`.
    pub fn toggle(&mut self, value: &T, options: &[T]) {
        let mut set = match self {
            Selection::All => options.iter().cloned().collect(),
            Selection::Only(set) => std::mem::take(set),
        };
        if !set.remove(value) {
            set.insert(value.clone());
        }
        *self = if !options.is_empty() && options.iter().all(|o| set.contains(o)) {
            Selection::All
        } else {
            Selection::Only(set)
        };
    }

    /// Number of options currently selected, for the `n/m` counter.
    pub fn selected_count(&self, options: &[T]) -> usize {
        options.iter().filter(|o| self.contains(o)).count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoyageFilter {
    All,
    #[default]
    Current,
    Past,
}

impl VoyageFilter {
    pub const OPTIONS: [VoyageFilter; 3] = [VoyageFilter::Current, VoyageFilter::Past, VoyageFilter::All];

    pub fn label(self) -> &'static str {
        match self {
            VoyageFilter::All => "All",
            VoyageFilter::Current => "Current",
            VoyageFilter::Past => "Past",
        }
    }

    pub fn admits(self, status: Option<&str>) -> bool {
        let status = status.map(str::trim).filter(|s| !s.is_empty());
        match self {
            VoyageFilter::All => true,
            VoyageFilter::Current => status.map_or(true, |s| s.eq_ignore_ascii_case("active")),
            VoyageFilter::Past => status.is_some_and(|s| s.eq_ignore_ascii_case("inactive")),
        }
    }
}

/// Which filter controls the fleet view shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterBarConfig {
    pub voyage: bool,
    pub ports: bool,
    pub statuses: bool,
    pub docs: bool,
}

impl Default for FilterBarConfig {
    fn default() -> Self {
        Self {
            voyage: true,
            ports: true,
            statuses: false,
            docs: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub voyage: VoyageFilter,
    pub ports: Selection<String>,
    pub statuses: Selection<String>,
    pub docs: Selection<String>,
}

impl FilterState {
    pub fn selection(&self, field: VesselField) -> &Selection<String> {
        match field {
            VesselField::ArrivalPort => &self.ports,
            VesselField::EventType => &self.statuses,
            VesselField::OfficeDoc => &self.docs,
        }
    }

    pub fn selection_mut(&mut self, field: VesselField) -> &mut Selection<String> {
        match field {
            VesselField::ArrivalPort => &mut self.ports,
            VesselField::EventType => &mut self.statuses,
            VesselField::OfficeDoc => &mut self.docs,
        }
    }

    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn admits(&self, vessel: &Vessel) -> bool {
        self.voyage.admits(vessel.record.status.as_deref())
            && admits_field(&self.ports, vessel, VesselField::ArrivalPort)
            && admits_field(&self.statuses, vessel, VesselField::EventType)
            && admits_field(&self.docs, vessel, VesselField::OfficeDoc)
            && matches_search(vessel, &self.search)
    }
}

fn admits_field(selection: &Selection<String>, vessel: &Vessel, field: VesselField) -> bool {
    match (selection, vessel.field(field)) {
        (Selection::All, _) | (_, None) => true,
        (Selection::Only(set), Some(value)) => set.contains(value),
    }
}

/// Case-insensitive substring match over name, IMO and arrival port.
pub fn matches_search(vessel: &Vessel, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        vessel.record.vessel_name.as_deref(),
        Some(vessel.record.imo_no.as_str()),
        vessel.record.arrival_port.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(&needle))
}

pub fn apply_filters(vessels: &[Vessel], filters: &FilterState) -> Vec<Vessel> {
    vessels
        .iter()
        .filter(|vessel| filters.admits(vessel))
        .cloned()
        .collect()
}

/// In port, or arriving today or later.
pub fn is_relevant(vessel: &Vessel, today_start: OffsetDateTime) -> bool {
    vessel.in_port || vessel.eta.is_some_and(|eta| eta >= today_start)
}

/// One record per IMO: the one with the latest load timestamp. Ties keep
/// the first seen; output follows first appearance of each IMO.
pub fn dedupe_latest(records: &[VesselRecord]) -> Vec<VesselRecord> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, (OffsetDateTime, &VesselRecord)> = HashMap::new();

    for record in records {
        let imo = record.imo_no.trim();
        if imo.is_empty() {
            tracing::debug!("dropping vessel record without IMO number");
            continue;
        }
        let Some(loaded) = record.load_timestamp() else {
            tracing::debug!(imo, "dropping vessel record without load timestamp");
            continue;
        };
        match latest.entry(imo) {
            Entry::Occupied(mut current) => {
                if loaded > current.get().0 {
                    current.insert((loaded, record));
                }
            }
            Entry::Vacant(slot) => {
                order.push(imo);
                slot.insert((loaded, record));
            }
        }
    }

    order
        .into_iter()
        .filter_map(|imo| latest.get(imo).map(|(_, record)| (*record).clone()))
        .collect()
}

/// In port first, then by ascending ETA; vessels without an ETA go last.
pub fn fleet_order(a: &Vessel, b: &Vessel) -> Ordering {
    b.in_port.cmp(&a.in_port).then_with(|| match (a.eta, b.eta) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Raw API rows to the base dataset the dashboard filters over.
pub fn prepare_fleet(raw: &[VesselRecord], now: OffsetDateTime) -> Vec<Vessel> {
    let today_start = start_of_day(now);
    let mut vessels: Vec<Vessel> = dedupe_latest(raw)
        .into_iter()
        .map(|record| Vessel::derive(record, now))
        .filter(|vessel| is_relevant(vessel, today_start))
        .collect();
    vessels.sort_by(fleet_order);
    vessels
}

/// Distinct non-empty values of a field, sorted, for the filter menus.
pub fn unique_values(vessels: &[Vessel], field: VesselField) -> Vec<String> {
    vessels
        .iter()
        .filter_map(|vessel| vessel.field(field))
        .map(|value| value.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-01-10 08:00 UTC);

    fn record(imo: &str) -> VesselRecord {
        VesselRecord {
            imo_no: imo.to_string(),
            dwh_load_date: Some("2025-01-01".into()),
            ..VesselRecord::default()
        }
    }

    fn vessel(record: VesselRecord) -> Vessel {
        Vessel::derive(record, NOW)
    }

    fn at_port(imo: &str, port: &str) -> Vessel {
        vessel(VesselRecord {
            arrival_port: Some(port.into()),
            ..record(imo)
        })
    }

    fn imos(vessels: &[Vessel]) -> Vec<&str> {
        vessels.iter().map(Vessel::imo).collect()
    }

    #[test]
    fn dedupe_keeps_latest_load_date() {
        let rows = ["2025-01-01", "2025-01-03", "2025-01-02"].map(|date| VesselRecord {
            dwh_load_date: Some(date.into()),
            ..record("9877872")
        });
        let deduped = dedupe_latest(&rows);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].dwh_load_date.as_deref(), Some("2025-01-03"));
    }

    #[test]
    fn dedupe_ties_keep_first_and_drop_undated() {
        let first = VesselRecord {
            vessel_name: Some("First".into()),
            ..record("1")
        };
        let second = VesselRecord {
            vessel_name: Some("Second".into()),
            ..record("1")
        };
        let undated = VesselRecord {
            dwh_load_date: None,
            ..record("2")
        };
        let blank = record("  ");
        let deduped = dedupe_latest(&[first, second, undated, blank]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].vessel_name.as_deref(), Some("First"));
    }

    #[test]
    fn berth_vessel_without_eta_is_relevant() {
        let berthed = vessel(VesselRecord {
            event_type: Some("At Berth - Gladstone".into()),
            ..record("9877872")
        });
        assert!(berthed.in_port);
        assert!(is_relevant(&berthed, start_of_day(NOW)));
    }

    #[test]
    fn relevance_uses_start_of_today() {
        let earlier_today = vessel(VesselRecord {
            eta: Some("2025-01-10T01:00:00Z".into()),
            ..record("1")
        });
        let yesterday = vessel(VesselRecord {
            eta: Some("2025-01-09T23:00:00Z".into()),
            ..record("2")
        });
        assert!(is_relevant(&earlier_today, start_of_day(NOW)));
        assert!(!is_relevant(&yesterday, start_of_day(NOW)));
    }

    #[test]
    fn prepare_orders_in_port_then_eta() {
        let raw = vec![
            VesselRecord {
                eta: Some("2025-01-15T00:00:00Z".into()),
                ..record("late")
            },
            VesselRecord {
                event_type: Some("In Port".into()),
                ..record("port")
            },
            VesselRecord {
                eta: Some("2025-01-11T00:00:00Z".into()),
                ..record("soon")
            },
            VesselRecord {
                eta: Some("2024-12-01T00:00:00Z".into()),
                ..record("gone")
            },
        ];
        let fleet = prepare_fleet(&raw, NOW);
        assert_eq!(imos(&fleet), ["port", "soon", "late"]);
    }

    #[test]
    fn padded_port_matches_its_trimmed_option() {
        let fleet = [at_port("1", "Gladstone "), at_port("2", "Newcastle")];
        let options = unique_values(&fleet, VesselField::ArrivalPort);
        assert_eq!(options, ["Gladstone", "Newcastle"]);

        let mut filters = FilterState::default();
        filters.ports.toggle(&"Newcastle".to_string(), &options);
        assert_eq!(imos(&apply_filters(&fleet, &filters)), ["1"]);
    }

    #[test]
    fn voyage_filter_reads_status() {
        assert!(VoyageFilter::Current.admits(Some("Active")));
        assert!(VoyageFilter::Current.admits(None));
        assert!(!VoyageFilter::Current.admits(Some("Inactive")));
        assert!(VoyageFilter::Past.admits(Some("Inactive")));
        assert!(!VoyageFilter::Past.admits(None));
        assert!(VoyageFilter::All.admits(Some("anything")));
    }

    #[test]
    fn empty_selection_only_passes_missing_fields() {
        let vessels = vec![at_port("1", "Gladstone"), vessel(record("2"))];
        let filters = FilterState {
            ports: Selection::none(),
            ..FilterState::default()
        };
        assert_eq!(imos(&apply_filters(&vessels, &filters)), ["2"]);
    }

    #[test]
    fn port_selection_and_search_combine() {
        let vessels = vec![
            vessel(VesselRecord {
                vessel_name: Some("Ocean Pearl".into()),
                arrival_port: Some("Gladstone".into()),
                ..record("1")
            }),
            vessel(VesselRecord {
                vessel_name: Some("Coral Star".into()),
                arrival_port: Some("Hay Point".into()),
                ..record("2")
            }),
            vessel(VesselRecord {
                vessel_name: Some("Pearl River".into()),
                arrival_port: Some("Newcastle".into()),
                ..record("3")
            }),
        ];
        let filters = FilterState {
            search: "  PEARL ".into(),
            ports: Selection::Only(["Gladstone".to_string(), "Hay Point".to_string()].into()),
            ..FilterState::default()
        };
        assert_eq!(imos(&apply_filters(&vessels, &filters)), ["1"]);
    }

    #[test]
    fn search_matches_imo() {
        let v = vessel(record("9877872"));
        assert!(matches_search(&v, "7787"));
        assert!(matches_search(&v, "   "));
        assert!(!matches_search(&v, "1234"));
    }

    #[test]
    fn toggle_moves_between_all_and_subset() {
        let options = vec!["A".to_string(), "B".to_string()];
        let mut selection = Selection::All;
        selection.toggle(&"A".to_string(), &options);
        assert_eq!(selection, Selection::Only(["B".to_string()].into()));
        assert_eq!(selection.selected_count(&options), 1);
        selection.toggle(&"A".to_string(), &options);
        assert_eq!(selection, Selection::All);
    }

    #[test]
    fn unique_values_are_sorted_and_distinct() {
        let vessels = vec![
            at_port("1", "Newcastle"),
            at_port("2", "Gladstone"),
            at_port("3", "Newcastle"),
            at_port("4", "  "),
        ];
        assert_eq!(
            unique_values(&vessels, VesselField::ArrivalPort),
            ["Gladstone", "Newcastle"]
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut filters = FilterState {
            search: "x".into(),
            voyage: VoyageFilter::Past,
            docs: Selection::none(),
            ..FilterState::default()
        };
        filters.reset();
        assert!(filters.is_default());
        assert_eq!(filters.voyage, VoyageFilter::Current);
    }

    fn port_strategy() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Gladstone".to_string())),
            Just(Some("Newcastle".to_string())),
            Just(Some("Hay Point".to_string())),
        ]
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            ports in proptest::collection::vec(port_strategy(), 0..30),
            keep_gladstone in any::<bool>(),
            search in "[a-z]{0,3}",
        ) {
            let vessels: Vec<Vessel> = ports
                .into_iter()
                .enumerate()
                .map(|(i, port)| vessel(VesselRecord { arrival_port: port, ..record(&i.to_string()) }))
                .collect();
            let mut selected = BTreeSet::from(["Newcastle".to_string()]);
            if keep_gladstone {
                selected.insert("Gladstone".to_string());
            }
            let filters = FilterState {
                search,
                ports: Selection::Only(selected),
                ..FilterState::default()
            };
            let once = apply_filters(&vessels, &filters);
            let twice = apply_filters(&once, &filters);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn dedupe_yields_unique_imos(imos in proptest::collection::vec(0u8..6, 0..40)) {
            let rows: Vec<VesselRecord> = imos
                .iter()
                .enumerate()
                .map(|(i, imo)| VesselRecord {
                    dwh_load_date: Some(format!("2025-01-{:02}", i % 28 + 1)),
                    ..record(&imo.to_string())
                })
                .collect();
            let deduped = dedupe_latest(&rows);
            let distinct: BTreeSet<_> = deduped.iter().map(|r| r.imo_no.clone()).collect();
            prop_assert_eq!(distinct.len(), deduped.len());
            let expected: BTreeSet<_> = imos.iter().map(|i| i.to_string()).collect();
            prop_assert_eq!(distinct, expected);
        }
    }
}
