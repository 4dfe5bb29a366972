//! Per-user settings, currently just the display currency.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, UserId, ValidationError};

/// The currency assigned to users that have not chosen one.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// A user's settings row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSettings {
    pub user_id: UserId,
    /// A three letter ISO 4217 code, e.g. "EUR".
    pub currency: String,
}

/// Check that `currency` looks like an ISO 4217 code: three uppercase ASCII letters.
fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if currency.len() == 3 && currency.bytes().all(|byte| byte.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCurrency(currency.to_owned()))
    }
}

/// Create the user_settings table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_user_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
            user_id TEXT PRIMARY KEY,
            currency TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the settings for `user_id`, creating them with [DEFAULT_CURRENCY] on first access.
///
/// # Errors
/// Returns a [Error::SqlError] if there is an SQL error.
pub fn get_or_create_user_settings(
    user_id: &UserId,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    connection.execute(
        "INSERT INTO user_settings (user_id, currency) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO NOTHING",
        (user_id, DEFAULT_CURRENCY),
    )?;

    let currency = connection.query_row(
        "SELECT currency FROM user_settings WHERE user_id = ?1",
        (user_id,),
        |row| row.get(0),
    )?;

    Ok(UserSettings {
        user_id: user_id.clone(),
        currency,
    })
}

/// Set the currency for `user_id`, creating the settings row if needed.
///
/// # Errors
/// Returns a [Error::Validation] if `currency` is not three uppercase
/// letters, or a [Error::SqlError] if there is an SQL error.
pub fn update_currency(
    user_id: &UserId,
    currency: &str,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    validate_currency(currency)?;

    connection.execute(
        "INSERT INTO user_settings (user_id, currency) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET currency = excluded.currency",
        (user_id, currency),
    )?;

    Ok(UserSettings {
        user_id: user_id.clone(),
        currency: currency.to_owned(),
    })
}

/// The state needed for the user settings endpoints.
#[derive(Debug, Clone)]
pub struct UserSettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserSettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a settings update.
#[derive(Debug, Deserialize)]
pub struct UpdateUserSettings {
    pub currency: String,
}

/// Return the user's settings.
pub async fn get_user_settings_endpoint(
    State(state): State<UserSettingsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<UserSettings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_or_create_user_settings(&user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to get user settings: {error}"))
        .map(Json)
}

/// Update the user's settings.
pub async fn update_user_settings_endpoint(
    State(state): State<UserSettingsState>,
    Extension(user_id): Extension<UserId>,
    Json(update): Json<UpdateUserSettings>,
) -> Result<Json<UserSettings>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_currency(&user_id, &update.currency, &connection).map(Json)
}
