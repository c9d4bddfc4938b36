use crate::clock::{BankClock, ParseError, BANK_WORKDAYS};
use crate::time::{Owner, TimePoint};
use log::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A span during which a crew member cannot take part.
/// Both bounds are time strings naming their day, e.g. `ПН 12:00+5`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusyTime {
    pub from: String,
    pub to: String,
}

impl BusyTime {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> BusyTime {
        BusyTime {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Daily opening and closing of the bank, without a day, e.g. `10:00+5`.
/// The bank's offset is the one given on `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkingHours {
    pub from: String,
    pub to: String,
}

impl WorkingHours {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> WorkingHours {
        WorkingHours {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub busy_times: Vec<BusyTime>,
}

impl Participant {
    /// Constructs a new Participant with the specified busy times.
    /// A participant's busy times must not overlap one another.
    pub fn new(name: impl Into<String>, busy_times: Vec<BusyTime>) -> Participant {
        Participant {
            name: name.into(),
            busy_times,
        }
    }
}

/// Everyone who has to be free at the same time. Order matters: the n-th
/// participant owns `Owner::member(n)` on the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Crew {
    members: Vec<Participant>,
}

impl Crew {
    pub fn new(members: Vec<Participant>) -> Crew {
        Crew { members }
    }

    pub fn push(&mut self, participant: Participant) {
        self.members.push(participant);
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Lays every bound of the bank's hours and the crew's busy times on a
    /// single timeline, in bank time, sorted by timestamp. Points sharing a
    /// timestamp keep the order they were added in: bank hours first, then
    /// each participant in turn.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::{BankClock, DAY_MS, HOUR_MS};
    /// use kairos_libs::schedule::{BusyTime, Crew, Participant, WorkingHours};
    /// use kairos_libs::time::Owner;
    ///
    /// let crew = Crew::new(vec![Participant::new(
    ///     "Danny",
    ///     vec![BusyTime::new("ПН 12:00+5", "ПН 17:00+5")],
    /// )]);
    /// let hours = WorkingHours::new("10:00+5", "18:00+5");
    ///
    /// let timeline = crew.timeline(&hours, &BankClock::new(5)).unwrap();
    ///
    /// // three days of opening and closing, plus Danny's two bounds
    /// assert_eq!(timeline.len(), 8);
    /// assert_eq!(timeline[0].timestamp, DAY_MS + 10 * HOUR_MS);
    /// assert_eq!(timeline[1].owner, Owner::member(0));
    /// ```
    pub fn timeline(
        &self,
        working_hours: &WorkingHours,
        clock: &BankClock,
    ) -> Result<Vec<TimePoint<i64>>, ParseError> {
        let bank = BANK_WORKDAYS
            .into_iter()
            .flat_map(move |day| [(&working_hours.from, day), (&working_hours.to, day)])
            .map(|(time, day)| {
                clock
                    .timestamp(time, Some(day))
                    .map(|timestamp| TimePoint::new(timestamp, Owner::BANK))
            });

        let crew = self
            .members
            .iter()
            .enumerate()
            .flat_map(move |(index, participant)| {
                participant
                    .busy_times
                    .iter()
                    .flat_map(|busy| [&busy.from, &busy.to])
                    .map(move |time| {
                        clock
                            .timestamp(time, None)
                            .map(|timestamp| TimePoint::new(timestamp, Owner::member(index)))
                    })
            });

        let mut timeline = bank.chain(crew).collect::<Result<Vec<_>, _>>()?;
        sort_timeline(&mut timeline);

        debug!(points = timeline.len(), participants = self.len(); "built timeline");

        Ok(timeline)
    }
}

impl<S> FromIterator<(S, Vec<BusyTime>)> for Crew
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, Vec<BusyTime>)>>(iter: I) -> Self {
        Crew::new(
            iter.into_iter()
                .map(|(name, busy_times)| Participant::new(name, busy_times))
                .collect(),
        )
    }
}

#[cfg(feature = "rayon")]
fn sort_timeline(timeline: &mut [TimePoint<i64>]) {
    timeline.par_sort_by_key(|point| point.timestamp);
}

#[cfg(not(feature = "rayon"))]
fn sort_timeline(timeline: &mut [TimePoint<i64>]) {
    timeline.sort_by_key(|point| point.timestamp);
}

/// A crew reads and writes as a map of names to busy times, keeping the
/// order the map was written in.
#[cfg(feature = "serde")]
mod crew_serde {
    use super::{BusyTime, Crew, Participant};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Crew {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for participant in self.members() {
                map.serialize_entry(&participant.name, &participant.busy_times)?;
            }
            map.end()
        }
    }

    struct CrewVisitor;

    impl<'de> Visitor<'de> for CrewVisitor {
        type Value = Crew;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of participant names to busy times")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Crew, A::Error> {
            let mut crew = Crew::default();
            while let Some((name, busy_times)) = access.next_entry::<String, Vec<BusyTime>>()? {
                crew.push(Participant::new(name, busy_times));
            }
            Ok(crew)
        }
    }

    impl<'de> Deserialize<'de> for Crew {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Crew, D::Error> {
            deserializer.deserialize_map(CrewVisitor)
        }
    }
}

/// Only well-formed schedules are generated: every participant gets sorted,
/// non-overlapping busy times, all landing between Sunday and Thursday.
#[cfg(feature = "arbitrary")]
mod generate {
    use super::{BusyTime, Crew, Participant, WorkingHours};
    use crate::clock::{ClockTime, Weekday};
    use arbitrary::{Arbitrary, Result, Unstructured};
    use std::collections::BTreeSet;

    const MAX_OFFSET: u32 = 12;
    const MAX_PARTICIPANTS: usize = 4;
    const MINUTES_PER_DAY: u32 = 24 * 60;
    /// Leaves room to shift every UTC minute by `MAX_OFFSET` and stay on Thursday
    const LAST_UTC_MINUTE: u32 = Weekday::ALL.len() as u32 * MINUTES_PER_DAY - MAX_OFFSET * 60;

    fn local_time(utc_minute: u32, offset: u32) -> ClockTime {
        let local = utc_minute + offset * 60;
        let day = Weekday::ALL[(local / MINUTES_PER_DAY) as usize];
        let minute_of_day = local % MINUTES_PER_DAY;
        ClockTime::new(Some(day), minute_of_day / 60, minute_of_day % 60, offset)
    }

    impl<'a> Arbitrary<'a> for Crew {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            let participants = u.int_in_range(0..=MAX_PARTICIPANTS)?;
            let mut crew = Crew::default();

            for index in 0..participants {
                let offset = u.int_in_range(0..=MAX_OFFSET)?;
                let mut bounds = u
                    .arbitrary_iter::<u32>()?
                    .map(|minute| minute.map(|minute| minute % LAST_UTC_MINUTE))
                    .collect::<Result<BTreeSet<_>>>()?
                    .into_iter()
                    .collect::<Vec<_>>();
                if bounds.len() % 2 == 1 {
                    bounds.pop();
                }

                let busy_times = bounds
                    .chunks_exact(2)
                    .map(|pair| {
                        BusyTime::new(
                            local_time(pair[0], offset).to_string(),
                            local_time(pair[1], offset).to_string(),
                        )
                    })
                    .collect();

                crew.push(Participant::new(format!("participant-{}", index), busy_times));
            }

            Ok(crew)
        }
    }

    impl<'a> Arbitrary<'a> for WorkingHours {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            let offset = u.int_in_range(0..=MAX_OFFSET)?;
            let opening = u.int_in_range(0..=MINUTES_PER_DAY - 2)?;
            let closing = u.int_in_range(opening + 1..=MINUTES_PER_DAY - 1)?;

            let time = |minute: u32| ClockTime::new(None, minute / 60, minute % 60, offset);

            Ok(WorkingHours::new(
                time(opening).to_string(),
                time(closing).to_string(),
            ))
        }
    }
}
