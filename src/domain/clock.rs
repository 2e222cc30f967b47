//! Time source for derived vessel fields.
//!
//! Everything that depends on "now" takes the instant as a parameter; the
//! clock only lives at the edges (pages, fetch handlers) so tests can pin it.

use std::rc::Rc;

use time::{Duration, OffsetDateTime, Time};

pub trait Clock {
    fn now(&self) -> OffsetDateTime;

    fn today_start(&self) -> OffsetDateTime {
        start_of_day(self.now())
    }
}

/// Wall clock in the local offset, falling back to UTC when the offset
/// cannot be determined (e.g. multi-threaded unix processes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Clock shared through the component tree. Defaults to the wall clock.
#[derive(Clone)]
pub struct ClockHandle(Rc<dyn Clock>);

impl ClockHandle {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self(Rc::new(clock))
    }
}

impl Default for ClockHandle {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl Clock for ClockHandle {
    fn now(&self) -> OffsetDateTime {
        self.0.now()
    }
}

pub fn start_of_day(instant: OffsetDateTime) -> OffsetDateTime {
    instant.replace_time(Time::MIDNIGHT)
}

pub fn days_between(from: OffsetDateTime, to: OffsetDateTime) -> f64 {
    (to - from).as_seconds_f64() / Duration::DAY.as_seconds_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn start_of_day_keeps_offset() {
        let instant = datetime!(2025-03-04 17:45:12 +10:00);
        assert_eq!(start_of_day(instant), datetime!(2025-03-04 00:00 +10:00));
    }

    #[test]
    fn fixed_clock_reports_today_start() {
        let clock = FixedClock(datetime!(2025-01-02 09:30 UTC));
        assert_eq!(clock.today_start(), datetime!(2025-01-02 00:00 UTC));
    }

    #[test]
    fn handle_reads_the_wrapped_clock() {
        let handle = ClockHandle::new(FixedClock(datetime!(2025-06-30 23:59 +10:00)));
        let copy = handle.clone();
        assert_eq!(copy.now(), datetime!(2025-06-30 23:59 +10:00));
        assert_eq!(copy.today_start(), datetime!(2025-06-30 00:00 +10:00));
    }

    #[test]
    fn days_between_is_fractional() {
        let from = datetime!(2025-01-01 00:00 UTC);
        let to = datetime!(2025-01-02 12:00 UTC);
        assert!((days_between(from, to) - 1.5).abs() < f64::EPSILON);
    }
}
