//! Endpoints serving the day and month aggregates.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserId, ValidationError,
    history::{MonthHistory, YearHistory, get_history_periods, get_month_history, get_year_history},
};

/// The state needed for reading history.
#[derive(Debug, Clone)]
pub struct HistoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for HistoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Return the per-month totals for `year`.
pub async fn get_year_history_endpoint(
    State(state): State<HistoryState>,
    Extension(user_id): Extension<UserId>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<YearHistory>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_year_history(&user_id, year, &connection).map(Json)
}

/// Return the per-day totals for `month` (0-11) of `year`.
pub async fn get_month_history_endpoint(
    State(state): State<HistoryState>,
    Extension(user_id): Extension<UserId>,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<Vec<MonthHistory>>, Error> {
    if month > 11 {
        return Err(ValidationError::InvalidMonth(month).into());
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_month_history(&user_id, year, month, &connection).map(Json)
}

/// Return the years that have history, in ascending order.
pub async fn get_history_periods_endpoint(
    State(state): State<HistoryState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Vec<i32>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_history_periods(&user_id, &connection).map(Json)
}
