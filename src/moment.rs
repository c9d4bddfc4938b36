use crate::clock::{format_timestamp, BankClock, ParseError, MINUTE_MS};
use crate::schedule::{Crew, WorkingHours};
use crate::time::{CommonFree, TimeRange};
use log::debug;

/// How far `Moment::try_later` pushes the start back
pub const TRY_LATER_DELAY_MS: i64 = 30 * MINUTE_MS;

/// Finds every stretch, on the bank's workdays, during which the bank is
/// open and the whole crew is free for at least `duration` minutes.
///
/// # Errors
/// Any time string that is not `[DD ]HH:MM+Z` fails the whole query with
/// a `ParseError`. Crew busy times must name their day.
///
/// # Examples
/// ```
/// use kairos_libs::moment::get_appropriate_moment;
/// use kairos_libs::schedule::{BusyTime, Crew, WorkingHours};
///
/// let crew: Crew = vec![
///     ("Danny", vec![BusyTime::new("ПН 12:00+5", "ПН 17:00+5")]),
///     ("Rusty", vec![BusyTime::new("ПН 08:00+5", "ПН 11:00+5")]),
/// ]
/// .into_iter()
/// .collect();
///
/// let moment =
///     get_appropriate_moment(&crew, 60, &WorkingHours::new("10:00+5", "18:00+5")).unwrap();
///
/// assert!(moment.exists());
/// assert_eq!(moment.format("%DD %HH:%MM"), "ПН 11:00");
/// ```
pub fn get_appropriate_moment(
    crew: &Crew,
    duration: u32,
    working_hours: &WorkingHours,
) -> Result<Moment, ParseError> {
    let clock = BankClock::from_opening(&working_hours.from)?;
    let timeline = crew.timeline(working_hours, &clock)?;
    let duration = i64::from(duration) * MINUTE_MS;

    let periods = timeline.iter().common_free(duration);
    debug!(periods = periods.len(); "found appropriate periods");

    Ok(Moment::new(periods, duration))
}

/// A cursor over the appropriate periods of one query.
///
/// The periods are owned by the cursor: `try_later` may move the start of the
/// current period forward in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moment {
    periods: Vec<TimeRange<i64>>,
    position: usize,
    duration: i64,
}

impl Moment {
    /// `periods` must be sorted, disjoint, and each at least `duration` long.
    pub fn new(periods: Vec<TimeRange<i64>>, duration: i64) -> Moment {
        Moment {
            periods,
            position: 0,
            duration,
        }
    }

    pub fn periods(&self) -> &[TimeRange<i64>] {
        &self.periods
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The period currently pointed at, if any are left
    pub fn current(&self) -> Option<TimeRange<i64>> {
        self.periods.get(self.position).copied()
    }

    pub fn exists(&self) -> bool {
        self.current().is_some()
    }

    /// Fills `%HH`, `%MM` and `%DD` with the start of the current period.
    /// Returns an empty string when no period is left.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::{DAY_MS, HOUR_MS};
    /// use kairos_libs::moment::Moment;
    /// use kairos_libs::time::TimeRange;
    ///
    /// let start = 3 * DAY_MS + 14 * HOUR_MS;
    /// let moment = Moment::new(vec![TimeRange::new(start, start + HOUR_MS)], HOUR_MS);
    /// assert_eq!(moment.format("Начинаем в %HH:%MM (%DD)"), "Начинаем в 14:00 (СР)");
    ///
    /// assert_eq!(Moment::new(vec![], HOUR_MS).format("%HH:%MM"), "");
    /// ```
    pub fn format(&self, template: &str) -> String {
        self.current()
            .map(|period| format_timestamp(template, period.start()))
            .unwrap_or_default()
    }

    /// Moves the start `TRY_LATER_DELAY_MS` later, first within the current
    /// period, then to the first later period that starts at least that far
    /// after the current start. On failure nothing changes.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::{DAY_MS, HOUR_MS, MINUTE_MS};
    /// use kairos_libs::moment::Moment;
    /// use kairos_libs::time::TimeRange;
    ///
    /// let start = DAY_MS + 10 * HOUR_MS;
    /// let mut moment = Moment::new(
    ///     vec![TimeRange::new(start, start + 90 * MINUTE_MS)],
    ///     HOUR_MS,
    /// );
    ///
    /// assert!(moment.try_later());
    /// assert_eq!(moment.format("%HH:%MM"), "10:30");
    /// assert!(!moment.try_later());
    /// assert_eq!(moment.format("%HH:%MM"), "10:30");
    /// ```
    pub fn try_later(&mut self) -> bool {
        match self.current() {
            Some(current) => {
                self.try_later_in_same_period(current) || self.try_later_in_next_periods(current)
            }
            None => false,
        }
    }

    fn try_later_in_same_period(&mut self, current: TimeRange<i64>) -> bool {
        let start = current.start() + TRY_LATER_DELAY_MS;
        if start + self.duration > current.end() {
            return false;
        }

        self.periods[self.position].0 = start;
        debug!(position = self.position, start = start; "moved later within period");

        true
    }

    fn try_later_in_next_periods(&mut self, current: TimeRange<i64>) -> bool {
        let earliest = current.start() + TRY_LATER_DELAY_MS;

        match self
            .periods
            .iter()
            .enumerate()
            .skip(self.position + 1)
            .find(|(_, period)| period.start() >= earliest)
        {
            Some((position, _)) => {
                debug!(from = self.position, to = position; "moved to a later period");
                self.position = position;
                true
            }
            None => false,
        }
    }
}
