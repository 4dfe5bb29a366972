//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/history/{year}', use [format_endpoint].

/// The route for recording transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for listing a user's categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for income and expense totals over a date range.
pub const BALANCE_STATS: &str = "/api/stats/balance";
/// The route for per-category totals over a date range.
pub const CATEGORY_STATS: &str = "/api/stats/categories";
/// The route for the years that have aggregate history.
pub const HISTORY_PERIODS: &str = "/api/history-periods";
/// The route for the monthly aggregates of a year.
pub const YEAR_HISTORY: &str = "/api/history/{year}";
/// The route for the daily aggregates of a month, where the month is 0-11.
pub const MONTH_HISTORY: &str = "/api/history/{year}/{month}";
/// The route for reading and updating user settings.
pub const USER_SETTINGS: &str = "/api/user-settings";

/// Replace the parameters in `endpoint_path` with `params`, in order.
///
/// Parameters without a matching value are left as is.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_endpoint("/api/history/{year}/{month}", &[2024, 2]), "/api/history/2024/2");
/// ```
pub fn format_endpoint(endpoint_path: &str, params: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut params = params.iter();
    let mut rest = endpoint_path;

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };
        let Some(param) = params.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(&param.to_string());
        rest = &rest[start + length + 1..];
    }

    formatted.push_str(rest);
    formatted
}
