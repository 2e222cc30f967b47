//! Chart series computed from the filtered fleet and the defect list.

use std::collections::{BTreeMap, HashMap};

use time::{Duration, OffsetDateTime};

use super::{clock::start_of_day, table::compare_text, vessel::Vessel};

pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartPoint {
    pub label: String,
    pub count: usize,
}

impl ChartPoint {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Count desc, ties alphabetical.
fn by_count(a: &ChartPoint, b: &ChartPoint) -> std::cmp::Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| compare_text(&a.label, &b.label))
}

fn label_of(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_LABEL)
}

/// Top `top_n` arrival ports by vessel count.
pub fn count_by_port(vessels: &[Vessel], top_n: usize) -> Vec<ChartPoint> {
    top_categories(
        vessels.iter().map(|v| v.record.arrival_port.as_deref()),
        top_n,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrivalBucket {
    InPort,
    Today,
    ThisWeek,
    Later,
}

impl ArrivalBucket {
    pub const ORDER: [ArrivalBucket; 4] = [
        ArrivalBucket::InPort,
        ArrivalBucket::Today,
        ArrivalBucket::ThisWeek,
        ArrivalBucket::Later,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArrivalBucket::InPort => "In Port",
            ArrivalBucket::Today => "Today",
            ArrivalBucket::ThisWeek => "This Week",
            ArrivalBucket::Later => "Later",
        }
    }

    /// `None` when the vessel is at sea with no ETA from today onwards.
    pub fn classify(vessel: &Vessel, today_start: OffsetDateTime) -> Option<Self> {
        if vessel.in_port {
            return Some(ArrivalBucket::InPort);
        }
        let eta = vessel.eta.filter(|eta| *eta >= today_start)?;
        let bucket = if eta < today_start + Duration::DAY {
            ArrivalBucket::Today
        } else if eta < today_start + Duration::days(7) {
            ArrivalBucket::ThisWeek
        } else {
            ArrivalBucket::Later
        };
        Some(bucket)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrivalTimeline {
    pub buckets: Vec<ChartPoint>,
    pub unclassified: usize,
}

impl ArrivalTimeline {
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum::<usize>() + self.unclassified
    }
}

pub fn arrival_timeline(vessels: &[Vessel], now: OffsetDateTime) -> ArrivalTimeline {
    if vessels.is_empty() {
        return ArrivalTimeline::default();
    }

    let today_start = start_of_day(now);
    let mut counts: HashMap<ArrivalBucket, usize> = HashMap::new();
    let mut unclassified = 0;
    for vessel in vessels {
        match ArrivalBucket::classify(vessel, today_start) {
            Some(bucket) => *counts.entry(bucket).or_default() += 1,
            None => unclassified += 1,
        }
    }

    ArrivalTimeline {
        buckets: ArrivalBucket::ORDER
            .iter()
            .map(|bucket| ChartPoint::new(bucket.label(), counts.get(bucket).copied().unwrap_or(0)))
            .collect(),
        unclassified,
    }
}

/// Exact-value grouping, sorted by count. Missing values count as "Unknown".
pub fn distribution<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Vec<ChartPoint> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(label_of(value)).or_default() += 1;
    }
    let mut points: Vec<ChartPoint> = counts
        .into_iter()
        .map(|(label, count)| ChartPoint::new(label, count))
        .collect();
    points.sort_by(by_count);
    points
}

/// Counts over a fixed category list, in that order, zeros included.
/// Values outside the list are ignored. No input means no series.
pub fn distribution_over<'a>(
    categories: &[&str],
    values: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<ChartPoint> {
    let mut values = values.into_iter().peekable();
    if values.peek().is_none() {
        return Vec::new();
    }

    let mut points: Vec<ChartPoint> = categories.iter().map(|c| ChartPoint::new(*c, 0)).collect();
    for value in values.flatten() {
        let value = value.trim();
        if let Some(point) = points.iter_mut().find(|p| p.label == value) {
            point.count += 1;
        }
    }
    points
}

/// The `n` most frequent non-empty values.
pub fn top_categories<'a>(
    values: impl IntoIterator<Item = Option<&'a str>>,
    n: usize,
) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = distribution(values)
        .into_iter()
        .filter(|p| p.label != UNKNOWN_LABEL)
        .collect();
    points.truncate(n);
    points
}

pub fn high_risk_count(vessels: &[Vessel]) -> usize {
    vessels.iter().filter(|v| v.is_high_risk()).count()
}
