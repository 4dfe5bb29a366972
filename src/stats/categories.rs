//! Transaction totals per category over a date range.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error, Money, TransactionType, UserId, config::ReportingConfig,
    stats::ReportRangeQuery,
};

/// The summed amount of one (type, category, icon) group.
///
/// Category and icon are the values snapshotted on the transactions, so a
/// category whose icon was changed can appear once per icon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub icon: String,
    pub amount: Money,
}

/// A category total with its share of the total for its type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    #[serde(flatten)]
    pub total: CategoryTotal,
    /// Percentage of the type's total, between 0 and 100.
    pub percentage: f64,
}

/// Sum the user's transactions in `from..=to` grouped by type, category and icon.
///
/// Groups are ordered by their summed amount, largest first. Ties are broken
/// by category name so the order is stable.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_category_breakdown(
    user_id: &UserId,
    from: Date,
    to: Date,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT type, category, icon, SUM(amount) AS total FROM \"transaction\"
             WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
             GROUP BY type, category, icon
             ORDER BY total DESC, category ASC;",
        )?
        .query_map((user_id, from, to), map_category_total_row)?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Compute each category's percentage of the total for `transaction_type`.
///
/// Totals of the other type are skipped and the input order is kept. When
/// the type's total is zero an item's own amount is used as the denominator.
pub fn category_shares(
    totals: &[CategoryTotal],
    transaction_type: TransactionType,
) -> Vec<CategoryShare> {
    let of_type = || {
        totals
            .iter()
            .filter(move |total| total.transaction_type == transaction_type)
    };
    let type_total: Money = of_type().map(|total| total.amount).sum();

    of_type()
        .map(|total| {
            let denominator = if type_total == Money::ZERO {
                total.amount
            } else {
                type_total
            };

            CategoryShare {
                total: total.clone(),
                percentage: total.amount.cents() as f64 * 100.0 / denominator.cents() as f64,
            }
        })
        .collect()
}

fn map_category_total_row(row: &Row) -> Result<CategoryTotal, rusqlite::Error> {
    Ok(CategoryTotal {
        transaction_type: row.get(0)?,
        category: row.get(1)?,
        icon: row.get(2)?,
        amount: row.get(3)?,
    })
}

/// The state needed for the category breakdown report.
#[derive(Debug, Clone)]
pub struct CategoryBreakdownState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub reporting_config: ReportingConfig,
}

impl FromRef<AppState> for CategoryBreakdownState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            reporting_config: state.reporting_config.clone(),
        }
    }
}

/// Return the category totals for the requested range with their percentages.
///
/// Income categories come first, then expense categories, each ordered by
/// amount, largest first.
pub async fn get_category_breakdown_endpoint(
    State(state): State<CategoryBreakdownState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<Vec<CategoryShare>>, Error> {
    let range = query.into_date_range(&state.reporting_config)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let totals = get_category_breakdown(&user_id, range.from, range.to, &connection)
        .inspect_err(|error| tracing::error!("Failed to get category breakdown: {error}"))?;

    let mut shares = category_shares(&totals, TransactionType::Income);
    shares.extend(category_shares(&totals, TransactionType::Expense));

    Ok(Json(shares))
}



#[cfg(test)]
mod category_breakdown_endpoint_tests {
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
        stats::get_category_breakdown_endpoint,
        transaction::{TransactionRequest, record_transaction},
    };

    use super::CategoryBreakdownState;

    #[tokio::test]
    async fn returns_ordered_shares() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = UserId::new("user_1");
        for name in ["Food", "Transport"] {
            create_category(
                &user,
                CategoryName::new_unchecked(name),
                CategoryIcon::new_unchecked("🧾"),
                TransactionType::Expense,
                &conn,
            )
            .unwrap();
        }
        for (amount, category) in [(20.0, "Transport"), (60.0, "Food")] {
            record_transaction(
                &user,
                TransactionRequest::new(amount, "expense", category, "2024-03-10"),
                &conn,
            )
            .unwrap();
        }
        let app = Router::new()
            .route(endpoints::CATEGORY_STATS, get(get_category_breakdown_endpoint))
            .layer(Extension(user))
            .with_state(CategoryBreakdownState {
                db_connection: Arc::new(Mutex::new(conn)),
                reporting_config: ReportingConfig::default(),
            });
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .get(endpoints::CATEGORY_STATS)
            .add_query_param("from", "2024-03-01")
            .add_query_param("to", "2024-03-31")
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["category"], "Food");
        assert_eq!(body[0]["amount"], 60.0);
        assert_eq!(body[0]["percentage"], 75.0);
        assert_eq!(body[0]["type"], "expense");
        assert_eq!(body[1]["category"], "Transport");
        assert_eq!(body[1]["percentage"], 25.0);
    }
}
