//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, Money, TransactionType, UserId,
    category::{Category, CategoryName},
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The category name and icon are copied from the category when the
/// transaction is recorded. Later edits to the category do not change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who recorded the transaction.
    pub user_id: UserId,
    /// The amount of money spent or earned, always positive.
    pub amount: Money,
    /// The UTC calendar day the transaction happened on.
    pub date: Date,
    /// A text description of what the transaction was for, may be empty.
    pub description: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The name of the category at the time of recording.
    pub category: String,
    /// The icon of the category at the time of recording.
    pub icon: String,
    /// The key the caller used to make the request idempotent, if any.
    pub idempotency_key: Option<String>,
}

/// A validated transaction that has not been stored yet.
///
/// Create one from a raw request with [NewTransaction::try_from].
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// An amount greater than zero.
    pub amount: Money,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// The name of the category to record the transaction against, exactly
    /// as requested.
    pub category: CategoryName,
    /// The UTC calendar day of the transaction.
    pub date: Date,
    /// A text description, empty if none was given.
    pub description: String,
    /// Optional caller-supplied key that makes retries safe.
    pub idempotency_key: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert `transaction` for `user_id`, snapshotting the name and icon of `category`.
///
/// This does not touch the aggregates, use
/// [record_transaction](crate::transaction::record_transaction) to record a transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransaction] if the user already has a transaction with the same idempotency key,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn insert_transaction(
    user_id: &UserId,
    transaction: &NewTransaction,
    category: &Category,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, amount, date, description, type, category, icon, idempotency_key)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, user_id, amount, date, description, type, category, icon, idempotency_key",
        )?
        .query_row(
            (
                user_id,
                transaction.amount,
                transaction.date,
                &transaction.description,
                transaction.transaction_type,
                category.name.as_ref(),
                category.icon.as_ref(),
                &transaction.idempotency_key,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateTransaction,
            error => error.into(),
        })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, amount, date, description, type, category, icon, idempotency_key
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category TEXT NOT NULL,
                icon TEXT NOT NULL,
                idempotency_key TEXT,
                UNIQUE(user_id, idempotency_key)
                )",
        (),
    )?;

    // Composite index used by the report queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        transaction_type: row.get(5)?,
        category: row.get(6)?,
        icon: row.get(7)?,
        idempotency_key: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, Money, TransactionType, UserId,
        category::{Category, CategoryIcon, CategoryName, create_category},
        db::initialize,
        transaction::{NewTransaction, count_transactions, get_transaction},
    };

    use super::insert_transaction;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_food_category(user: &UserId, conn: &Connection) -> Category {
        create_category(
            user,
            CategoryName::new_unchecked("Food"),
            CategoryIcon::new_unchecked("🍔"),
            TransactionType::Expense,
            conn,
        )
        .unwrap()
    }

    fn new_transaction(cents: i64, idempotency_key: Option<&str>) -> NewTransaction {
        NewTransaction {
            amount: Money::from_cents(cents),
            transaction_type: TransactionType::Expense,
            category: CategoryName::new_unchecked("Food"),
            date: date!(2024 - 03 - 20),
            description: "Lunch".to_owned(),
            idempotency_key: idempotency_key.map(str::to_owned),
        }
    }

    #[test]
    fn insert_snapshots_category_name_and_icon() {
        let conn = get_test_connection();
        let user = UserId::new("user_1");
        let category = create_food_category(&user, &conn);

        let inserted = insert_transaction(&user, &new_transaction(3000, None), &category, &conn)
            .expect("Could not insert transaction");

        let got = get_transaction(inserted.id, &conn).unwrap();
        assert_eq!(got, inserted);
        assert_eq!(got.category, "Food");
        assert_eq!(got.icon, "🍔");
        assert_eq!(got.date, date!(2024 - 03 - 20));
        assert_eq!(got.transaction_type, TransactionType::Expense);
    }

    #[test]
    fn amount_is_stored_as_integer_cents() {
        let conn = get_test_connection();
        let user = UserId::new("user_1");
        let category = create_food_category(&user, &conn);
        let inserted = insert_transaction(&user, &new_transaction(1999, None), &category, &conn)
            .expect("Could not insert transaction");

        let (storage_type, stored): (String, i64) = conn
            .query_row(
                "SELECT typeof(amount), amount FROM \"transaction\" WHERE id = ?1",
                [inserted.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        assert_eq!(storage_type, "integer");
        assert_eq!(stored, 1999);
        assert_eq!(inserted.amount, Money::from_cents(1999));
    }

    #[test]
    fn insert_fails_on_duplicate_idempotency_key() {
        let conn = get_test_connection();
        let user = UserId::new("user_1");
        let category = create_food_category(&user, &conn);
        insert_transaction(&user, &new_transaction(3000, Some("abc")), &category, &conn)
            .expect("Could not insert transaction");

        let duplicate =
            insert_transaction(&user, &new_transaction(3000, Some("abc")), &category, &conn);

        assert_eq!(duplicate, Err(Error::DuplicateTransaction));
    }

    #[test]
    fn transactions_without_key_are_never_duplicates() {
        let conn = get_test_connection();
        let user = UserId::new("user_1");
        let category = create_food_category(&user, &conn);

        for _ in 0..3 {
            insert_transaction(&user, &new_transaction(100, None), &category, &conn)
                .expect("Could not insert transaction");
        }

        assert_eq!(count_transactions(&conn), Ok(3));
    }

    #[test]
    fn table_rejects_non_positive_amount() {
        let conn = get_test_connection();
        let user = UserId::new("user_1");
        let category = create_food_category(&user, &conn);

        let result = insert_transaction(&user, &new_transaction(0, None), &category, &conn);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }
}
