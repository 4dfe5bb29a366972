//! Running income and expense totals per calendar day and per calendar month.
//!
//! The rows are denormalized aggregates of the transaction table. They are
//! created lazily by the first transaction in a period and only ever
//! incremented afterwards, always inside the same SQL transaction as the
//! transaction insert that caused the increment.

mod db;
mod endpoint;
mod period;

pub use db::{
    create_history_tables, get_history_periods, get_month_history, get_year_history,
    increment_month_history, increment_year_history,
};
pub use endpoint::{get_history_periods_endpoint, get_month_history_endpoint, get_year_history_endpoint};
pub use period::{DayPeriod, MonthHistory, MonthPeriod, YearHistory};
