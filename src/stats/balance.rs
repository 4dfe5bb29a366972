//! Income and expense totals over a date range.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error, Money, TransactionType, UserId, config::ReportingConfig,
    stats::ReportRangeQuery,
};

/// The total income and expenses of a user within a date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Balance {
    pub income: Money,
    pub expense: Money,
}

impl Balance {
    /// Income minus expenses, negative when more was spent than earned.
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Sum the user's transaction amounts per type for dates in `from..=to`.
///
/// A type without transactions in the range reports zero.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_balance(
    user_id: &UserId,
    from: Date,
    to: Date,
    connection: &Connection,
) -> Result<Balance, Error> {
    let mut statement = connection.prepare(
        "SELECT type, SUM(amount) FROM \"transaction\"
         WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
         GROUP BY type;",
    )?;
    let totals = statement.query_map((user_id, from, to), |row| {
        Ok((row.get::<_, TransactionType>(0)?, row.get::<_, Money>(1)?))
    })?;

    let mut balance = Balance::default();
    for total in totals {
        match total? {
            (TransactionType::Income, amount) => balance.income = amount,
            (TransactionType::Expense, amount) => balance.expense = amount,
        }
    }

    Ok(balance)
}

/// The state needed for the balance report.
#[derive(Debug, Clone)]
pub struct BalanceState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub reporting_config: ReportingConfig,
}

impl FromRef<AppState> for BalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            reporting_config: state.reporting_config.clone(),
        }
    }
}

/// The balance report sent to clients.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub income: Money,
    pub expense: Money,
    /// Income minus expenses.
    pub balance: Money,
}

impl From<Balance> for BalanceResponse {
    fn from(balance: Balance) -> Self {
        Self {
            income: balance.income,
            expense: balance.expense,
            balance: balance.net(),
        }
    }
}

/// Return the user's income and expense totals for the requested range.
pub async fn get_balance_endpoint(
    State(state): State<BalanceState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<BalanceResponse>, Error> {
    let range = query.into_date_range(&state.reporting_config)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let balance = get_balance(&user_id, range.from, range.to, &connection)
        .inspect_err(|error| tracing::error!("Failed to get balance: {error}"))?;

    Ok(Json(balance.into()))
}


#[cfg(test)]
mod balance_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{
        TransactionType, UserId,
        category::{CategoryIcon, CategoryName, create_category},
        config::ReportingConfig,
        db::initialize,
        endpoints,
        stats::get_balance_endpoint,
        transaction::{TransactionRequest, record_transaction},
    };

    use super::BalanceState;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = UserId::new("user_1");
        create_category(
            &user,
            CategoryName::new_unchecked("Salary"),
            CategoryIcon::new_unchecked("💰"),
            TransactionType::Income,
            &conn,
        )
        .unwrap();
        record_transaction(
            &user,
            TransactionRequest::new(150.0, "income", "Salary", "2024-03-15"),
            &conn,
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::BALANCE_STATS, get(get_balance_endpoint))
            .layer(Extension(user))
            .with_state(BalanceState {
                db_connection: Arc::new(Mutex::new(conn)),
                reporting_config: ReportingConfig {
                    max_range_days: 90,
                    ..Default::default()
                },
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn returns_totals_and_net_balance() {
        let server = get_test_server();

        let response = server
            .get(endpoints::BALANCE_STATS)
            .add_query_param("from", "2024-03-01")
            .add_query_param("to", "2024-03-31")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["income"], 150.0);
        assert_eq!(body["expense"], 0.0);
        assert_eq!(body["balance"], 150.0);
    }

    #[tokio::test]
    async fn range_wider_than_limit_is_bad_request() {
        let server = get_test_server();

        server
            .get(endpoints::BALANCE_STATS)
            .add_query_param("from", "2024-01-01")
            .add_query_param("to", "2024-12-31")
            .await
            .assert_status_bad_request();
    }
}
