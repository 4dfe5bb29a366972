//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The ways a transaction request or report query can be malformed.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// The amount was missing, not a number, not greater than zero or had
    /// more than two decimal places.
    #[error("amount must be greater than zero with at most two decimal places, got {0}")]
    InvalidAmount(String),

    /// The request body was not a JSON object of the expected shape.
    #[error("{0}")]
    MalformedBody(String),

    /// The transaction type was not exactly "income" or "expense".
    #[error("transaction type must be \"income\" or \"expense\", got \"{0}\"")]
    InvalidTransactionType(String),

    /// The date could not be parsed as a calendar date or RFC 3339 timestamp.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// A category name was empty or only whitespace.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// A category icon was not exactly one grapheme, e.g. a single emoji.
    #[error("category icon must be a single character, got \"{0}\"")]
    InvalidIcon(String),

    /// A currency code was not a three letter uppercase code such as "EUR".
    #[error("\"{0}\" is not a valid currency code")]
    InvalidCurrency(String),

    /// A month index was outside of 0-11.
    #[error("month must be between 0 and 11, got {0}")]
    InvalidMonth(u8),
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request was malformed and was rejected before touching the database.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// No category with the given name and transaction type exists for the user.
    ///
    /// Transactions can only be recorded against existing categories, the
    /// ingestion path never creates categories implicitly.
    #[error("the category \"{0}\" could not be found")]
    CategoryNotFound(String),

    /// The atomic unit of a transaction insert plus both aggregate upserts
    /// failed, so none of the writes were applied.
    ///
    /// The string is the underlying database error and should only be logged.
    #[error("could not store the transaction: {0}")]
    StorageTransaction(String),

    /// The request did not carry a resolved user identity.
    #[error("authentication required")]
    AuthenticationRequired,

    /// A transaction with the same idempotency key has already been recorded.
    ///
    /// Rejecting the duplicate keeps a retried request from incrementing the
    /// aggregates a second time.
    #[error("a transaction with this idempotency key already exists")]
    DuplicateTransaction,

    /// The user already has a category with this name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// The report date range is inverted or wider than the configured maximum.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidDateRange(_) => StatusCode::BAD_REQUEST,
            Error::CategoryNotFound(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Error::DuplicateTransaction | Error::DuplicateCategoryName(_) => StatusCode::CONFLICT,
            Error::StorageTransaction(_) | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // The details of internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
