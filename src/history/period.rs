//! Calendar bucket keys and the aggregate rows stored under them.

use serde::Serialize;
use time::Date;

use crate::{Money, UserId};

/// The key of a day aggregate: a UTC calendar day.
///
/// `month` is zero-based (January is 0), `day` is one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DayPeriod {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl DayPeriod {
    /// The bucket for `date`, taken from its calendar fields as is.
    ///
    /// Callers must hand in the UTC calendar date, no timezone conversion
    /// happens here.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()) - 1,
            day: date.day(),
        }
    }

    /// The month that contains this day.
    pub fn month_period(self) -> MonthPeriod {
        MonthPeriod {
            year: self.year,
            month: self.month,
        }
    }
}

/// The key of a month aggregate. `month` is zero-based (January is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u8,
}

/// The income and expense totals of one user for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthHistory {
    pub user_id: UserId,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub income: Money,
    pub expense: Money,
}

/// The income and expense totals of one user for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearHistory {
    pub user_id: UserId,
    pub year: i32,
    pub month: u8,
    pub income: Money,
    pub expense: Money,
}
