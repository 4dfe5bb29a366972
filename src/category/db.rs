//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error, TransactionType, UserId,
    category::{Category, CategoryIcon, CategoryName},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if the user already has a category called `name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    user_id: &UserId,
    name: CategoryName,
    icon: CategoryIcon,
    transaction_type: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (user_id, name, icon, type) VALUES (?1, ?2, ?3, ?4);",
            (user_id, name.as_ref(), icon.as_ref(), transaction_type),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        user_id: user_id.clone(),
        name,
        icon,
        transaction_type,
    })
}

/// Find the user's category called exactly `name`.
///
/// The match is case-sensitive. The table enforces one category per name and
/// user, the ordering only keeps the lookup deterministic should that
/// constraint ever be missing.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn find_category(
    user_id: &UserId,
    name: &str,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, icon, type FROM category
             WHERE user_id = :user_id AND name = :name
             ORDER BY id ASC
             LIMIT 1;",
        )?
        .query_row(
            rusqlite::named_params! { ":user_id": user_id, ":name": name },
            map_row,
        )
        .optional()
        .map_err(|error| error.into())
}

/// Retrieve the user's categories ordered alphabetically by name.
///
/// If `transaction_type` is given, only categories of that type are returned.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categories(
    user_id: &UserId,
    transaction_type: Option<TransactionType>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, icon, type FROM category
             WHERE user_id = :user_id AND (:type IS NULL OR type = :type)
             ORDER BY name ASC;",
        )?
        .query_map(
            rusqlite::named_params! { ":user_id": user_id, ":type": transaction_type },
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            UNIQUE(user_id, name)
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_type ON category(user_id, type);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_icon: String = row.get(3)?;
    let transaction_type = row.get(4)?;

    Ok(Category {
        id,
        user_id,
        name: CategoryName::new_unchecked(&raw_name),
        icon: CategoryIcon::new_unchecked(&raw_icon),
        transaction_type,
    })
}
