//! Runtime configuration carried in the application state.

/// The default maximum width of a report date range, in days.
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 365;

/// The default request header the upstream identity provider sets.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

/// The config that controls report queries.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    /// The widest date range, in days, a report may cover.
    pub max_range_days: i64,
    /// The canonical timezone name, e.g. "Pacific/Auckland", used to pick the
    /// default report range when a request omits it.
    pub local_timezone: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }
}

/// The config for resolving the user behind a request.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// The header holding the user ID resolved by the identity provider.
    pub header_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_IDENTITY_HEADER.to_owned(),
        }
    }
}
