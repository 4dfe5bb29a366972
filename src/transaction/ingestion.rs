//! Records transactions together with their aggregate increments.
//!
//! Every recorded transaction adds its amount to exactly one day aggregate and
//! exactly one month aggregate. The insert and both increments run in a
//! single SQL transaction, so either all three are visible or none are, and
//! the aggregates always equal the sum of the transactions they cover.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Error, Money, TransactionType, UserId, ValidationError,
    category::{CategoryName, find_category},
    date::parse_date,
    history::{DayPeriod, increment_month_history, increment_year_history},
    transaction::core::{NewTransaction, Transaction, insert_transaction},
};

/// A request to record a transaction, as sent by a client.
///
/// Nothing about the request has been checked yet, see [NewTransaction::try_from].
/// Missing fields deserialize to empty values so that they fail validation
/// with a [ValidationError] like any other malformed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// The amount of money as a JSON number or decimal string, must be
    /// greater than zero with at most two decimal places.
    #[serde(default)]
    pub amount: Value,
    /// The name of an existing category of the same type.
    #[serde(default)]
    pub category: String,
    /// A calendar date `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub date: String,
    /// An optional text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Either "income" or "expense".
    #[serde(rename = "type", default)]
    pub transaction_type: String,
    /// An optional key that makes retrying the request safe.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl TransactionRequest {
    /// Create a request without a description or idempotency key.
    pub fn new(amount: f64, transaction_type: &str, category: &str, date: &str) -> Self {
        Self {
            amount: amount.into(),
            category: category.to_owned(),
            date: date.to_owned(),
            description: None,
            transaction_type: transaction_type.to_owned(),
            idempotency_key: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the idempotency key.
    pub fn idempotency_key(mut self, key: &str) -> Self {
        self.idempotency_key = Some(key.to_owned());
        self
    }
}

impl TryFrom<TransactionRequest> for NewTransaction {
    type Error = ValidationError;

    fn try_from(request: TransactionRequest) -> Result<Self, Self::Error> {
        let amount = parse_amount(&request.amount)?;
        let transaction_type = request.transaction_type.parse::<TransactionType>()?;
        let date = parse_date(&request.date)?;
        // Categories are resolved by exact name, so surrounding whitespace is kept.
        if request.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        let category = CategoryName::new_unchecked(&request.category);
        // A blank key would make every blank-keyed retry collide, treat it as no key.
        let idempotency_key = request
            .idempotency_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        Ok(Self {
            amount,
            transaction_type,
            category,
            date,
            description: request.description.unwrap_or_default(),
            idempotency_key,
        })
    }
}

/// Parse a JSON number or decimal string into a positive amount of money.
fn parse_amount(amount: &Value) -> Result<Money, ValidationError> {
    let text = match amount {
        Value::String(text) => text.trim().to_owned(),
        other => other.to_string(),
    };

    match text.parse::<Money>() {
        Ok(money) if money.is_positive() => Ok(money),
        _ => Err(ValidationError::InvalidAmount(text)),
    }
}

/// Validate and record a transaction for `user_id`.
///
/// The category is resolved before the write starts. The insert and the day
/// and month aggregate increments then run in one immediate SQL transaction
/// that is rolled back if any step fails.
///
/// # Errors
/// This function will return a:
/// - [Error::Validation] if the amount, type, date or category name is malformed,
/// - [Error::CategoryNotFound] if the user has no category with that name and type,
/// - [Error::DuplicateTransaction] if the idempotency key was already used,
/// - or [Error::StorageTransaction] if the atomic write failed.
///
/// Nothing is written when an error is returned.
pub fn record_transaction(
    user_id: &UserId,
    request: TransactionRequest,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = NewTransaction::try_from(request)?;

    let category = find_category(user_id, transaction.category.as_ref(), connection)?
        .filter(|category| category.transaction_type == transaction.transaction_type)
        .ok_or_else(|| Error::CategoryNotFound(transaction.category.to_string()))?;

    let day = DayPeriod::from_date(transaction.date);

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)
            .inspect_err(|error| tracing::error!("could not start transaction: {error}"))
            .map_err(|error| Error::StorageTransaction(error.to_string()))?;

    let recorded = insert_transaction(user_id, &transaction, &category, &sql_transaction)
        .and_then(|recorded| {
            increment_month_history(
                user_id,
                day,
                transaction.transaction_type,
                transaction.amount,
                &sql_transaction,
            )?;
            increment_year_history(
                user_id,
                day.month_period(),
                transaction.transaction_type,
                transaction.amount,
                &sql_transaction,
            )?;

            Ok(recorded)
        })
        .inspect_err(|error| tracing::error!("Failed to record transaction: {error}"))
        .map_err(into_storage_error)?;

    sql_transaction
        .commit()
        .inspect_err(|error| tracing::error!("could not commit transaction: {error}"))
        .map_err(|error| Error::StorageTransaction(error.to_string()))?;

    tracing::debug!(
        "Recorded {} of {} in \"{}\" for user {} on {}",
        recorded.transaction_type,
        recorded.amount,
        recorded.category,
        user_id,
        recorded.date
    );

    Ok(recorded)
}

/// Errors inside the atomic unit mean the unit failed as a whole, except for
/// duplicate keys which the caller can act on.
fn into_storage_error(error: Error) -> Error {
    match error {
        Error::DuplicateTransaction => Error::DuplicateTransaction,
        Error::SqlError(error) => Error::StorageTransaction(error.to_string()),
        error => Error::StorageTransaction(error.to_string()),
    }
}

#[cfg(test)]
mod validation_tests {
    use serde_json::json;
    use time::macros::date;

    use crate::{
        Money, TransactionType, ValidationError,
        transaction::{NewTransaction, TransactionRequest},
    };

    #[test]
    fn valid_request_is_converted() {
        let request = TransactionRequest::new(12.5, "expense", "Food", "2024-03-20")
            .description("Lunch")
            .idempotency_key("key-1");

        let got = NewTransaction::try_from(request).unwrap();

        assert_eq!(got.amount, Money::from_cents(1250));
        assert_eq!(got.transaction_type, TransactionType::Expense);
        assert_eq!(got.category.as_ref(), "Food");
        assert_eq!(got.date, date!(2024 - 03 - 20));
        assert_eq!(got.description, "Lunch");
        assert_eq!(got.idempotency_key.as_deref(), Some("key-1"));
    }

    #[test]
    fn missing_description_is_empty() {
        let request = TransactionRequest::new(1.0, "income", "Salary", "2024-03-15");

        let got = NewTransaction::try_from(request).unwrap();

        assert_eq!(got.description, "");
    }

    #[test]
    fn negative_amount_is_rejected() {
        let request = TransactionRequest::new(-5.0, "expense", "Food", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidAmount("-5.0".to_owned()))
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let request = TransactionRequest::new(0.0, "expense", "Food", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidAmount("0.0".to_owned()))
        );
    }

    #[test]
    fn amount_below_one_cent_is_rejected() {
        let request = TransactionRequest::new(0.125, "expense", "Food", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidAmount("0.125".to_owned()))
        );
    }

    #[test]
    fn decimal_string_amount_is_accepted() {
        let mut request = TransactionRequest::new(1.0, "expense", "Food", "2024-03-20");
        request.amount = json!(" 0.10 ");

        assert_eq!(
            NewTransaction::try_from(request).unwrap().amount,
            Money::from_cents(10)
        );
    }

    #[test]
    fn missing_or_non_numeric_amount_is_rejected() {
        for amount in [json!(null), json!("ten"), json!(true), json!([1])] {
            let mut request = TransactionRequest::new(1.0, "expense", "Food", "2024-03-20");
            request.amount = amount.clone();

            assert!(
                matches!(
                    NewTransaction::try_from(request),
                    Err(ValidationError::InvalidAmount(_))
                ),
                "amount {amount} should be rejected"
            );
        }
    }

    #[test]
    fn missing_fields_fail_validation() {
        let request: TransactionRequest = serde_json::from_value(json!({ "amount": 5 })).unwrap();

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidTransactionType(String::new()))
        );
    }

    #[test]
    fn category_name_is_kept_as_given() {
        let request = TransactionRequest::new(5.0, "expense", "  Food ", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request).unwrap().category.as_ref(),
            "  Food "
        );
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        for amount in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let request = TransactionRequest::new(amount, "expense", "Food", "2024-03-20");

            assert!(matches!(
                NewTransaction::try_from(request),
                Err(ValidationError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let request = TransactionRequest::new(5.0, "transfer", "Food", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn invalid_date_is_rejected() {
        let request = TransactionRequest::new(5.0, "expense", "Food", "2024-13-01");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::InvalidDate("2024-13-01".to_owned()))
        );
    }

    #[test]
    fn empty_category_is_rejected() {
        let request = TransactionRequest::new(5.0, "expense", "  ", "2024-03-20");

        assert_eq!(
            NewTransaction::try_from(request),
            Err(ValidationError::EmptyCategoryName)
        );
    }

    #[test]
    fn blank_idempotency_key_is_ignored() {
        let request =
            TransactionRequest::new(5.0, "expense", "Food", "2024-03-20").idempotency_key("   ");

        assert_eq!(NewTransaction::try_from(request).unwrap().idempotency_key, None);
    }
}
