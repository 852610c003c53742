//! Calendar date validation and normalization to UTC midnight.
//!
//! Entry dates have no time-of-day. They are stored as the instant of
//! midnight UTC on that date so that the stored value reads back as the same
//! calendar date no matter which timezone the server runs in.

use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// Whether `year`, `month` (1-12) and `day` form a real Gregorian calendar date.
///
/// Leap years are taken into account, so 2024-02-29 is valid but 2023-02-29 is not.
pub fn validate_calendar_date(year: i32, month: u8, day: u8) -> bool {
    calendar_date(year, month, day).is_some()
}

/// The instant of midnight UTC on the calendar date `year`-`month`-`day`.
///
/// # Errors
///
/// Returns an [Error::InvalidCalendarDate] if the triple is not a real date.
pub fn to_utc_midnight(year: i32, month: u8, day: u8) -> Result<OffsetDateTime, Error> {
    calendar_date(year, month, day)
        .map(date_to_utc_midnight)
        .ok_or(Error::InvalidCalendarDate { year, month, day })
}

/// The instant of midnight UTC on `date`.
pub fn date_to_utc_midnight(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

/// The first and last day of the month containing `reference`, both as UTC midnight.
///
/// Both ends are inclusive, so an entry dated on the last day of the month
/// compares less than or equal to the end of the window.
///
/// # Errors
///
/// Returns an [Error::InvalidCalendarDate] if the month lies at the edge of
/// the supported date range.
pub fn month_window(reference: Date) -> Result<(OffsetDateTime, OffsetDateTime), Error> {
    let year = reference.year();
    let month = reference.month();
    let out_of_range = || Error::InvalidCalendarDate {
        year,
        month: month as u8,
        day: reference.day(),
    };

    let first_day = Date::from_calendar_date(year, month, 1).map_err(|_| out_of_range())?;
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };
    let last_day = Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(|first_of_next_month| first_of_next_month.previous_day())
        .ok_or_else(out_of_range)?;

    Ok((
        date_to_utc_midnight(first_day),
        date_to_utc_midnight(last_day),
    ))
}

fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    let month = Month::try_from(month).ok()?;

    Date::from_calendar_date(year, month, day).ok()
}


#[cfg(test)]
mod utc_midnight_tests {
    use time::{Month, UtcOffset, macros::date};

    use crate::Error;

    use super::{month_window, to_utc_midnight};

    #[test]
    fn round_trips_through_utc_fields() {
        for (year, month, day) in [(2024, 6, 15), (2024, 2, 29), (1970, 1, 1), (2023, 12, 31)] {
            let timestamp = to_utc_midnight(year, month, day).unwrap();

            assert_eq!(timestamp.offset(), UtcOffset::UTC);
            assert_eq!(timestamp.year(), year);
            assert_eq!(timestamp.month() as u8, month);
            assert_eq!(timestamp.day(), day);
            assert_eq!(
                (timestamp.hour(), timestamp.minute(), timestamp.second()),
                (0, 0, 0)
            );
        }
    }

    #[test]
    fn matches_unix_timestamp() {
        let timestamp = to_utc_midnight(2024, 6, 15).unwrap();

        assert_eq!(timestamp.unix_timestamp(), 1_718_409_600);
    }

    #[test]
    fn invalid_date_is_an_error() {
        assert_eq!(
            to_utc_midnight(2023, 2, 29),
            Err(Error::InvalidCalendarDate {
                year: 2023,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn month_window_spans_first_to_last_day() {
        let (start, end) = month_window(date!(2024 - 06 - 15)).unwrap();

        assert_eq!(start, to_utc_midnight(2024, 6, 1).unwrap());
        assert_eq!(end, to_utc_midnight(2024, 6, 30).unwrap());
    }

    #[test]
    fn month_window_handles_december_and_leap_february() {
        let (start, end) = month_window(date!(2023 - 12 - 31)).unwrap();
        assert_eq!(start.date(), date!(2023 - 12 - 01));
        assert_eq!(end.date(), date!(2023 - 12 - 31));

        let (start, end) = month_window(date!(2024 - 02 - 01)).unwrap();
        assert_eq!(start.month(), Month::February);
        assert_eq!(end.date(), date!(2024 - 02 - 29));
    }
}
