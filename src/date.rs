//! Parsing of incoming dates and inclusive report date ranges.

use serde::Serialize;
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::{Error, ValidationError};

/// Parse a date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Timestamps are converted to UTC and their UTC calendar date is returned,
/// so `2024-03-15T23:30:00-02:00` is the 16th of March.
///
/// # Errors
/// Returns [ValidationError::InvalidDate] if `text` is neither format or is
/// not a real calendar date, e.g. `2024-02-30`.
pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|date_time| date_time.to_offset(UtcOffset::UTC).date())
        .map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// An inclusive range of calendar dates for reporting queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// The first day included in the range.
    pub from: Date,
    /// The last day included in the range.
    pub to: Date,
}

impl DateRange {
    /// Create a range that is no wider than `max_days`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `from` is after `to` or the
    /// difference between them is more than `max_days` days.
    pub fn new(from: Date, to: Date, max_days: i64) -> Result<Self, Error> {
        if from > to {
            return Err(Error::InvalidDateRange(format!(
                "the start date {from} is after the end date {to}"
            )));
        }

        let days = (to - from).whole_days();
        if days > max_days {
            return Err(Error::InvalidDateRange(format!(
                "the range spans {days} days, the maximum is {max_days} days"
            )));
        }

        Ok(Self { from, to })
    }

    /// The range from the first day of the month of `today` through `today`.
    pub fn month_to_date(today: Date) -> Self {
        Self {
            from: today.replace_day(1).unwrap_or(today),
            to: today,
        }
    }
}

#[cfg(test)]
mod parse_date_tests {
    use time::macros::date;

    use crate::{ValidationError, date::parse_date};

    #[test]
    fn parses_calendar_date() {
        assert_eq!(parse_date("2024-03-15"), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn parses_utc_timestamp() {
        assert_eq!(
            parse_date("2024-03-15T00:00:00.000Z"),
            Ok(date!(2024 - 03 - 15))
        );
    }

    #[test]
    fn uses_utc_day_of_offset_timestamp() {
        assert_eq!(
            parse_date("2024-03-15T23:30:00-02:00"),
            Ok(date!(2024 - 03 - 16))
        );
    }

    #[test]
    fn rejects_impossible_date() {
        assert_eq!(
            parse_date("2024-02-30"),
            Err(ValidationError::InvalidDate("2024-02-30".to_owned()))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("next tuesday").is_err());
        assert!(parse_date("").is_err());
    }
}

#[cfg(test)]
mod date_range_tests {
    use time::macros::date;

    use crate::{Error, date::DateRange};

    #[test]
    fn accepts_single_day() {
        let range = DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 01), 365);

        assert!(range.is_ok());
    }

    #[test]
    fn accepts_range_of_exactly_max_days() {
        let range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31), 30);

        assert!(range.is_ok());
    }

    #[test]
    fn rejects_range_over_max_days() {
        let range = DateRange::new(date!(2024 - 01 - 01), date!(2024 - 02 - 01), 30);

        assert!(matches!(range, Err(Error::InvalidDateRange(_))));
    }

    #[test]
    fn rejects_inverted_range() {
        let range = DateRange::new(date!(2024 - 03 - 31), date!(2024 - 03 - 01), 365);

        assert!(matches!(range, Err(Error::InvalidDateRange(_))));
    }

    #[test]
    fn month_to_date_starts_on_first() {
        let range = DateRange::month_to_date(date!(2024 - 03 - 20));

        assert_eq!(range.from, date!(2024 - 03 - 01));
        assert_eq!(range.to, date!(2024 - 03 - 20));
    }
}
