//! Reporting reads over the transaction table.
//!
//! The queries read transactions directly rather than the aggregate tables.
//! Range width limits are enforced by the handlers, not by the queries.

mod balance;
mod categories;
mod range;

pub use balance::{Balance, get_balance, get_balance_endpoint};
pub use categories::{
    CategoryShare, CategoryTotal, category_shares, get_category_breakdown,
    get_category_breakdown_endpoint,
};
pub use range::ReportRangeQuery;
