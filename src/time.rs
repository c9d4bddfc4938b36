use itertools::Itertools;
use log::trace;
use num::Integer;
use std::fmt::{Debug, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Half-open [start, end) time range
/// <N>: Any integer type
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeRange<N>(pub N, pub N)
where
    N: Integer + Copy;

impl<N> TimeRange<N>
where
    N: Integer + Copy,
{
    /// Construct a new Time Range
    /// Range is half-open on [start, end)
    /// # Examples
    /// ```
    /// use kairos_libs::time::TimeRange;
    ///
    /// let test = TimeRange::new(0, 100);
    ///
    /// assert_eq!(test.0, 0);
    /// assert_eq!(test.1, 100);
    /// ```
    pub fn new(start: N, end: N) -> TimeRange<N> {
        TimeRange(start, end)
    }

    /// Convenience function for readability
    /// Returns the start of the TimeRange
    pub fn start(self) -> N {
        self.0
    }

    /// Convenience function for readability
    /// Returns the end of the TimeRange
    pub fn end(self) -> N {
        self.1
    }

    /// Length of the range. Zero when `start == end`.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::time::TimeRange;
    ///
    /// assert_eq!(TimeRange::new(30, 120).len(), 90);
    /// ```
    pub fn len(self) -> N {
        self.1 - self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 >= self.1
    }

    /// Whether something lasting `duration` fits inside this range.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::time::TimeRange;
    ///
    /// let range = TimeRange::new(10, 40);
    /// assert!(range.fits(30));
    /// assert!(!range.fits(31));
    /// ```
    pub fn fits(self, duration: N) -> bool {
        !self.is_empty() && self.len() >= duration
    }
}

impl<N> Display for TimeRange<N>
where
    N: Integer + Copy + Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.0, self.1)
    }
}

/// Whose boundary a `TimePoint` marks.
/// `Owner::BANK` is always 0, crew members are numbered from 1 in the
/// order they were added to the crew.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Owner(pub usize);

impl Owner {
    pub const BANK: Owner = Owner(0);

    /// Owner of the crew member at zero-based `index`.
    pub fn member(index: usize) -> Owner {
        Owner(index + 1)
    }

    pub fn is_bank(self) -> bool {
        self == Owner::BANK
    }
}

/// A single boundary on the timeline: an opening/closing of the bank, or
/// the start/end of a crew member's busy time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimePoint<N> {
    pub timestamp: N,
    pub owner: Owner,
}

impl<N> TimePoint<N> {
    pub fn new(timestamp: N, owner: Owner) -> TimePoint<N> {
        TimePoint { timestamp, owner }
    }
}

pub trait CommonFree<N>
where
    N: Integer + Copy,
{
    fn common_free(self, duration: N) -> Vec<TimeRange<N>>;
}

impl<'a, T, N> CommonFree<N> for T
where
    T: Iterator<Item = &'a TimePoint<N>>,
    N: 'a + Integer + Copy + Debug,
{
    /// Self is a timeline sorted by timestamp. Returns every gap between two
    /// consecutive points during which the bank is open and nobody is busy,
    /// provided the gap is at least `duration` long.
    ///
    /// Each owner carries a single flag that flips on every point it owns.
    /// The bank starts closed and every crew member starts free, so this only
    /// tracks the real state when each owner's ranges never overlap and every
    /// range contributes exactly one point per bound.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::time::{CommonFree, Owner, TimePoint, TimeRange};
    ///
    /// let timeline = vec![
    ///     TimePoint::new(0, Owner::BANK),
    ///     TimePoint::new(3, Owner::member(0)),
    ///     TimePoint::new(5, Owner::member(0)),
    ///     TimePoint::new(10, Owner::BANK),
    /// ];
    ///
    /// assert_eq!(
    ///     timeline.iter().common_free(2),
    ///     vec![TimeRange::new(0, 3), TimeRange::new(5, 10)]
    /// );
    /// assert_eq!(timeline.iter().common_free(4), vec![TimeRange::new(5, 10)]);
    /// ```
    fn common_free(self, duration: N) -> Vec<TimeRange<N>> {
        let mut available = vec![false];
        let mut periods = Vec::new();

        for (previous, current) in self.tuple_windows() {
            let owner = previous.owner.0;
            if owner >= available.len() {
                available.resize(owner + 1, true);
            }
            available[owner] = !available[owner];

            if available.iter().all(|&free| free) {
                let period = TimeRange::new(previous.timestamp, current.timestamp);
                if period.fits(duration) {
                    trace!("common free period {:?}", period);
                    periods.push(period);
                }
            }
        }

        periods
    }
}
