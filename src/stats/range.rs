//! The date range query parameters shared by the report endpoints.

use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    config::ReportingConfig,
    date::{DateRange, parse_date},
    timezone::get_local_date,
};

/// The `from` and `to` query parameters of a report, both inclusive.
///
/// Either bound may be omitted, the defaults are the first day of the current
/// month and today in the configured local timezone.
#[derive(Debug, Default, Deserialize)]
pub struct ReportRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReportRangeQuery {
    /// Parse the bounds and check the range against `config.max_range_days`.
    ///
    /// # Errors
    /// Returns a [Error::Validation] if a bound is not a valid date, or a
    /// [Error::InvalidDateRange] if the range is inverted or too wide.
    pub fn into_date_range(self, config: &ReportingConfig) -> Result<DateRange, Error> {
        let today = get_local_date(&config.local_timezone).unwrap_or_else(|| {
            tracing::warn!(
                "Could not get local timezone \"{}\", falling back to UTC.",
                config.local_timezone
            );
            OffsetDateTime::now_utc().date()
        });
        let default_range = DateRange::month_to_date(today);

        let from = match self.from {
            Some(from) => parse_date(&from)?,
            None => default_range.from,
        };
        let to = match self.to {
            Some(to) => parse_date(&to)?,
            None => default_range.to,
        };

        DateRange::new(from, to, config.max_range_days)
    }
}
