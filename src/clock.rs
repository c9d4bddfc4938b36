use regex::Regex;
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// `[ДД ]ЧЧ:ММ+Z`, e.g. `ПН 09:00+3` or `10:00+5`
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:([a-zа-яё]{2}) )?([0-9]{2}):([0-9]{2})\+([0-9]+)$").expect("Invalid time regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed time `{0}`, expected `[DD ]HH:MM+Z`")]
    Malformed(String),
    #[error("Unknown day `{0}`")]
    UnknownDay(String),
    #[error("Time `{0}` has no day and none was implied")]
    MissingDay(String),
    #[error("Time `{0}` names a day where the day is already implied")]
    UnexpectedDay(String),
    #[error("Invalid number in `{input}`: {source}")]
    Number {
        input: String,
        #[source]
        source: ParseIntError,
    },
}

/// The days a time string may name. Nothing ever happens past Thursday.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
}

/// The only days the bank opens.
pub const BANK_WORKDAYS: [Weekday; 3] = [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday];

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
    ];

    /// Days since Sunday
    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Weekday> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Weekday::ALL.get(index).copied())
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Weekday::Sunday => "ВС",
            Weekday::Monday => "ПН",
            Weekday::Tuesday => "ВТ",
            Weekday::Wednesday => "СР",
            Weekday::Thursday => "ЧТ",
        }
    }
}

impl FromStr for Weekday {
    type Err = ParseError;

    /// Case-insensitive lookup of a two letter abbreviation
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::Weekday;
    ///
    /// assert_eq!("СР".parse(), Ok(Weekday::Wednesday));
    /// assert_eq!("пн".parse(), Ok(Weekday::Monday));
    /// assert!("ПТ".parse::<Weekday>().is_err());
    /// ```
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let upper = token.to_uppercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.abbreviation() == upper)
            .ok_or_else(|| ParseError::UnknownDay(token.to_string()))
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// A parsed time string, still in its own UTC offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockTime {
    pub day: Option<Weekday>,
    pub hour: u32,
    pub minute: u32,
    /// Hours east of UTC
    pub offset: u32,
}

impl ClockTime {
    pub fn new(day: Option<Weekday>, hour: u32, minute: u32, offset: u32) -> ClockTime {
        ClockTime {
            day,
            hour,
            minute,
            offset,
        }
    }
}

impl FromStr for ClockTime {
    type Err = ParseError;

    /// # Examples
    /// ```
    /// use kairos_libs::clock::{ClockTime, Weekday};
    ///
    /// assert_eq!(
    ///     "ВТ 09:30+3".parse(),
    ///     Ok(ClockTime::new(Some(Weekday::Tuesday), 9, 30, 3))
    /// );
    /// assert_eq!("18:00+10".parse(), Ok(ClockTime::new(None, 18, 0, 10)));
    /// assert!("ВТ 9:30+3".parse::<ClockTime>().is_err());
    /// ```
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let captures = TIME_PATTERN
            .captures(input)
            .ok_or_else(|| ParseError::Malformed(input.to_string()))?;

        let day = captures
            .get(1)
            .map(|token| token.as_str().parse::<Weekday>())
            .transpose()?;

        let number = |index: usize| -> Result<u32, ParseError> {
            captures[index]
                .parse()
                .map_err(|source| ParseError::Number {
                    input: input.to_string(),
                    source,
                })
        };

        Ok(ClockTime::new(day, number(2)?, number(3)?, number(4)?))
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day) = self.day {
            write!(f, "{} ", day)?;
        }
        write!(f, "{:02}:{:02}+{}", self.hour, self.minute, self.offset)
    }
}

/// Converts time strings into milliseconds on the bank's own clock, so
/// times given in any offset can be compared directly with bank hours.
/// Millisecond 0 is Sunday 00:00 in the bank's offset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BankClock {
    offset: u32,
}

impl BankClock {
    pub fn new(offset: u32) -> BankClock {
        BankClock { offset }
    }

    /// Takes the bank's offset from its opening time, e.g. `10:00+5`
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::BankClock;
    ///
    /// assert_eq!(BankClock::from_opening("10:00+5").map(|c| c.offset()), Ok(5));
    /// ```
    pub fn from_opening(opening: &str) -> Result<BankClock, ParseError> {
        let time: ClockTime = opening.parse()?;
        Ok(BankClock::new(time.offset))
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Milliseconds since Sunday 00:00 bank time. The day comes either from
    /// `input` or from `day`, never both; otherwise parsing fails.
    ///
    /// # Examples
    /// ```
    /// use kairos_libs::clock::{BankClock, Weekday, HOUR_MS, DAY_MS};
    ///
    /// let clock = BankClock::new(5);
    ///
    /// assert_eq!(clock.timestamp("ПН 10:00+5", None), Ok(DAY_MS + 10 * HOUR_MS));
    /// // 09:00 at UTC+3 is 11:00 at UTC+5
    /// assert_eq!(
    ///     clock.timestamp("09:00+3", Some(Weekday::Monday)),
    ///     Ok(DAY_MS + 11 * HOUR_MS)
    /// );
    /// assert!(clock.timestamp("09:00+3", None).is_err());
    /// assert!(clock.timestamp("ПН 09:00+3", Some(Weekday::Monday)).is_err());
    /// ```
    pub fn timestamp(&self, input: &str, day: Option<Weekday>) -> Result<i64, ParseError> {
        let time: ClockTime = input.parse()?;
        let day = match (time.day, day) {
            (Some(day), None) | (None, Some(day)) => day,
            (None, None) => return Err(ParseError::MissingDay(input.to_string())),
            (Some(_), Some(_)) => return Err(ParseError::UnexpectedDay(input.to_string())),
        };

        let hour = i64::from(time.hour) - i64::from(time.offset) + i64::from(self.offset);

        Ok(day.ordinal() * DAY_MS + hour * HOUR_MS + i64::from(time.minute) * MINUTE_MS)
    }
}

/// Fills the first `%HH`, `%MM` and `%DD` in `template` with the hour,
/// minute and day of `timestamp` on the bank's clock.
///
/// # Examples
/// ```
/// use kairos_libs::clock::{format_timestamp, DAY_MS, HOUR_MS, MINUTE_MS};
///
/// let timestamp = 2 * DAY_MS + 9 * HOUR_MS + 5 * MINUTE_MS;
///
/// assert_eq!(format_timestamp("%DD %HH:%MM", timestamp), "ВТ 09:05");
/// assert_eq!(format_timestamp("%HH %HH", timestamp), "09 %HH");
/// ```
pub fn format_timestamp(template: &str, timestamp: i64) -> String {
    let day = Weekday::from_ordinal(timestamp.div_euclid(DAY_MS))
        .map(Weekday::abbreviation)
        .unwrap_or_default();
    let time_of_day = timestamp.rem_euclid(DAY_MS);
    let hour = time_of_day / HOUR_MS;
    let minute = time_of_day % HOUR_MS / MINUTE_MS;

    template
        .replacen("%HH", &format!("{:02}", hour), 1)
        .replacen("%MM", &format!("{:02}", minute), 1)
        .replacen("%DD", day, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_days() {
        assert_eq!(
            "чт 23:59+0".parse(),
            Ok(ClockTime::new(Some(Weekday::Thursday), 23, 59, 0))
        );
    }

    #[test]
    fn rejects_malformed_times() {
        for input in ["", "ПН", "ПН 10:00", "ПН 10:00+", "ПН  10:00+5", "ПН 10:00-5", "10:0+5"] {
            assert_eq!(
                input.parse::<ClockTime>(),
                Err(ParseError::Malformed(input.to_string())),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn rejects_days_outside_the_table() {
        assert_eq!(
            "СБ 10:00+5".parse::<ClockTime>(),
            Err(ParseError::UnknownDay("СБ".to_string()))
        );
    }

    #[test]
    fn rejects_offsets_that_overflow() {
        assert!(matches!(
            "10:00+99999999999".parse::<ClockTime>(),
            Err(ParseError::Number { .. })
        ));
    }

    #[test]
    fn display_round_trips_the_wire_format() {
        for input in ["ПН 09:00+3", "00:00+0", "ВС 23:30+12"] {
            let time: ClockTime = input.parse().unwrap();
            assert_eq!(time.to_string(), input);
        }
    }

    #[test]
    fn rejects_a_day_when_one_is_implied() {
        let clock = BankClock::new(0);

        assert_eq!(
            clock.timestamp("СР 00:00+0", Some(Weekday::Monday)),
            Err(ParseError::UnexpectedDay("СР 00:00+0".to_string()))
        );
    }

    #[test]
    fn only_ascii_digits_are_times() {
        for input in ["١٠:٠٠+5", "ПН 10:00+٥", "ПН １０:00+5"] {
            assert_eq!(
                input.parse::<ClockTime>(),
                Err(ParseError::Malformed(input.to_string())),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn normalizing_crosses_midnight() {
        let clock = BankClock::new(0);

        // ВТ 02:00 at UTC+5 is ПН 21:00 at UTC
        let timestamp = clock.timestamp("ВТ 02:00+5", None).unwrap();
        assert_eq!(timestamp, DAY_MS + 21 * HOUR_MS);
        assert_eq!(format_timestamp("%DD %HH:%MM", timestamp), "ПН 21:00");
    }

    #[test]
    fn unknown_days_format_empty() {
        assert_eq!(format_timestamp("[%DD]", 6 * DAY_MS), "[]");
        assert_eq!(format_timestamp("[%DD] %HH", -HOUR_MS), "[] 23");
    }

    #[test]
    fn templates_without_tokens_are_untouched() {
        assert_eq!(format_timestamp("no tokens", DAY_MS), "no tokens");
    }

    #[test]
    fn bank_clock_needs_a_well_formed_opening() {
        assert_eq!(
            BankClock::from_opening("10:00"),
            Err(ParseError::Malformed("10:00".to_string()))
        );
    }
}
