pub mod clock;
pub mod moment;
pub mod schedule;
pub mod time;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use clock::{ParseError, Weekday, BANK_WORKDAYS};
pub use moment::{get_appropriate_moment, Moment, TRY_LATER_DELAY_MS};
pub use schedule::{BusyTime, Crew, Participant, WorkingHours};
pub use time::TimeRange;

#[cfg(test)]
mod tests {
    use crate::clock::{DAY_MS, HOUR_MS, MINUTE_MS};
    use crate::moment::get_appropriate_moment;
    use crate::schedule::{BusyTime, Crew, WorkingHours};
    use crate::time::TimeRange;
    use itertools::Itertools;

    fn gang() -> Crew {
        vec![
            (
                "Danny",
                vec![
                    BusyTime::new("ПН 12:00+5", "ПН 17:00+5"),
                    BusyTime::new("ВТ 13:00+5", "ВТ 16:00+5"),
                ],
            ),
            (
                "Rusty",
                vec![
                    BusyTime::new("ПН 11:30+5", "ПН 16:30+5"),
                    BusyTime::new("ВТ 13:00+5", "ВТ 16:00+5"),
                ],
            ),
            (
                "Linus",
                vec![
                    BusyTime::new("ПН 09:00+3", "ПН 14:00+3"),
                    BusyTime::new("ПН 21:00+3", "ВТ 09:30+3"),
                    BusyTime::new("СР 09:30+3", "СР 15:00+3"),
                ],
            ),
        ]
        .into_iter()
        .collect()
    }

    fn bank() -> WorkingHours {
        WorkingHours::new("10:00+5", "18:00+5")
    }

    #[test]
    fn finds_the_gang_a_moment() {
        let moment = get_appropriate_moment(&gang(), 90, &bank()).unwrap();

        assert!(moment.exists());
        assert_eq!(
            moment.format("Метим на %DD, старт в %HH:%MM!"),
            "Метим на ВТ, старт в 11:30!"
        );
    }

    #[test]
    fn gang_tries_later_until_wednesday() {
        let mut moment = get_appropriate_moment(&gang(), 90, &bank()).unwrap();

        assert!(moment.try_later());
        assert_eq!(moment.format("%DD %HH:%MM"), "ВТ 16:00");

        assert!(moment.try_later());
        assert_eq!(moment.format("%DD %HH:%MM"), "ВТ 16:30");

        assert!(moment.try_later());
        assert_eq!(moment.format("%DD %HH:%MM"), "СР 10:00");

        assert!(!moment.try_later());
        assert_eq!(moment.format("%DD %HH:%MM"), "СР 10:00");
    }

    #[test]
    fn nobody_busy_means_monday_opening() {
        let moment =
            get_appropriate_moment(&Crew::default(), 60, &WorkingHours::new("09:00+0", "18:00+0"))
                .unwrap();

        assert_eq!(
            moment.current(),
            Some(TimeRange::new(DAY_MS + 9 * HOUR_MS, DAY_MS + 18 * HOUR_MS))
        );
        assert_eq!(moment.periods().len(), 3);
    }

    #[test]
    fn busy_monday_and_tuesday_leaves_wednesday() {
        let crew: Crew = vec![(
            "Basher",
            vec![
                BusyTime::new("ПН 09:00+0", "ПН 18:00+0"),
                BusyTime::new("ВТ 08:00+0", "ВТ 19:00+0"),
            ],
        )]
        .into_iter()
        .collect();

        let moment =
            get_appropriate_moment(&crew, 60, &WorkingHours::new("09:00+0", "18:00+0")).unwrap();

        assert_eq!(moment.format("%DD %HH:%MM"), "СР 09:00");
    }

    #[test]
    fn duration_longer_than_the_bank_is_open() {
        let mut moment = get_appropriate_moment(&gang(), 8 * 60 + 1, &bank()).unwrap();

        assert!(moment.periods().is_empty());
        assert!(!moment.exists());
        assert_eq!(moment.format("%DD %HH:%MM"), "");
        assert!(!moment.try_later());
    }

    #[test]
    fn crew_in_another_offset_is_moved_to_bank_time() {
        // 07:00 to 10:00 at UTC+2 is 10:00 to 13:00 at UTC+5
        let crew: Crew = vec![("Saul", vec![BusyTime::new("ПН 07:00+2", "ПН 10:00+2")])]
            .into_iter()
            .collect();

        let moment = get_appropriate_moment(&crew, 30, &bank()).unwrap();

        assert_eq!(moment.format("%DD %HH:%MM"), "ПН 13:00");
    }

    #[test]
    fn periods_are_long_enough_ascending_and_disjoint() {
        let moment = get_appropriate_moment(&gang(), 60, &bank()).unwrap();
        let duration = 60 * MINUTE_MS;

        assert!(!moment.periods().is_empty());
        assert!(moment.periods().iter().all(|period| period.fits(duration)));
        assert!(moment
            .periods()
            .iter()
            .tuple_windows()
            .all(|(left, right)| left.end() < right.start()));
    }

    #[test]
    fn try_later_never_goes_back() {
        let mut moment = get_appropriate_moment(&gang(), 30, &bank()).unwrap();
        let duration = 30 * MINUTE_MS;

        let mut position = moment.position();
        while moment.try_later() {
            assert!(moment.position() >= position);
            position = moment.position();

            let current = moment.current().unwrap();
            assert!(current.start() <= current.end() - duration);
        }
        assert!(moment.exists());
    }

    #[test]
    fn malformed_input_fails_the_query() {
        assert!(get_appropriate_moment(&gang(), 90, &WorkingHours::new("10:00", "18:00+5")).is_err());

        let crew: Crew = vec![("Danny", vec![BusyTime::new("ПН 12-00+5", "ПН 17:00+5")])]
            .into_iter()
            .collect();
        assert!(get_appropriate_moment(&crew, 90, &bank()).is_err());
    }

    #[test]
    fn working_hours_with_a_day_fail_the_query() {
        let hours = WorkingHours::new("ПН 10:00+5", "ПН 18:00+5");

        assert!(get_appropriate_moment(&Crew::default(), 60, &hours).is_err());
    }
}
