//! Database operations for the day and month aggregates.

use rusqlite::{Connection, Row};

use crate::{
    Error, Money, TransactionType, UserId,
    history::{DayPeriod, MonthHistory, MonthPeriod, YearHistory},
};

/// Add `amount` to the user's totals for the day `period`.
///
/// The row is created if it does not exist yet, seeded with this amount on the
/// side matching `transaction_type` and zero on the other. Otherwise only the
/// matching side is incremented. The increment happens inside SQLite so that
/// concurrent writers cannot lose an update.
///
/// Callers should run this in the same SQL transaction as the insert of the
/// transaction it accounts for.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn increment_month_history(
    user_id: &UserId,
    period: DayPeriod,
    transaction_type: TransactionType,
    amount: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let (income, expense) = transaction_type.split_amount(amount);

    connection.execute(
        "INSERT INTO month_history (user_id, year, month, day, income, expense)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(user_id, year, month, day) DO UPDATE SET
            income = income + excluded.income,
            expense = expense + excluded.expense;",
        (
            user_id,
            period.year,
            period.month,
            period.day,
            income,
            expense,
        ),
    )?;

    Ok(())
}

/// Add `amount` to the user's totals for the month `period`.
///
/// Follows the same create-or-increment rule as [increment_month_history].
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn increment_year_history(
    user_id: &UserId,
    period: MonthPeriod,
    transaction_type: TransactionType,
    amount: Money,
    connection: &Connection,
) -> Result<(), Error> {
    let (income, expense) = transaction_type.split_amount(amount);

    connection.execute(
        "INSERT INTO year_history (user_id, year, month, income, expense)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id, year, month) DO UPDATE SET
            income = income + excluded.income,
            expense = expense + excluded.expense;",
        (user_id, period.year, period.month, income, expense),
    )?;

    Ok(())
}

/// Get the day totals of the user for one month, ordered by day.
///
/// Days without transactions have no row and are not returned.
pub fn get_month_history(
    user_id: &UserId,
    year: i32,
    month: u8,
    connection: &Connection,
) -> Result<Vec<MonthHistory>, Error> {
    connection
        .prepare(
            "SELECT user_id, year, month, day, income, expense FROM month_history
             WHERE user_id = ?1 AND year = ?2 AND month = ?3
             ORDER BY day ASC;",
        )?
        .query_map((user_id, year, month), map_month_history_row)?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Get the month totals of the user for one year, ordered by month.
///
/// Months without transactions have no row and are not returned.
pub fn get_year_history(
    user_id: &UserId,
    year: i32,
    connection: &Connection,
) -> Result<Vec<YearHistory>, Error> {
    connection
        .prepare(
            "SELECT user_id, year, month, income, expense FROM year_history
             WHERE user_id = ?1 AND year = ?2
             ORDER BY month ASC;",
        )?
        .query_map((user_id, year), map_year_history_row)?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Get the years in which the user has recorded transactions, in ascending order.
pub fn get_history_periods(user_id: &UserId, connection: &Connection) -> Result<Vec<i32>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT year FROM year_history
             WHERE user_id = ?1
             ORDER BY year ASC;",
        )?
        .query_map((user_id,), |row| row.get(0))?
        .map(|maybe_year| maybe_year.map_err(|error| error.into()))
        .collect()
}

/// Create the day and month aggregate tables.
///
/// The composite unique keys are what the upserts conflict on.
pub fn create_history_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS month_history (
            user_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 0 AND 11),
            day INTEGER NOT NULL CHECK (day BETWEEN 1 AND 31),
            income INTEGER NOT NULL DEFAULT 0 CHECK (income >= 0),
            expense INTEGER NOT NULL DEFAULT 0 CHECK (expense >= 0),
            PRIMARY KEY (user_id, year, month, day)
        );

        CREATE TABLE IF NOT EXISTS year_history (
            user_id TEXT NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 0 AND 11),
            income INTEGER NOT NULL DEFAULT 0 CHECK (income >= 0),
            expense INTEGER NOT NULL DEFAULT 0 CHECK (expense >= 0),
            PRIMARY KEY (user_id, year, month)
        );",
    )?;

    Ok(())
}

fn map_month_history_row(row: &Row) -> Result<MonthHistory, rusqlite::Error> {
    Ok(MonthHistory {
        user_id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        day: row.get(3)?,
        income: row.get(4)?,
        expense: row.get(5)?,
    })
}

fn map_year_history_row(row: &Row) -> Result<YearHistory, rusqlite::Error> {
    Ok(YearHistory {
        user_id: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        income: row.get(3)?,
        expense: row.get(4)?,
    })
}
