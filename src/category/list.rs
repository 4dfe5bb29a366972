//! Endpoint for listing a user's categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, TransactionType, UserId,
    category::{Category, get_categories},
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optional filter on the category type.
#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    /// Either "income" or "expense". All categories are returned when absent.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

/// Return the user's categories ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<CategoriesState>,
    Extension(user_id): Extension<UserId>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Json<Vec<Category>>, Error> {
    let transaction_type = query
        .transaction_type
        .as_deref()
        .map(str::parse::<TransactionType>)
        .transpose()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_categories(&user_id, transaction_type, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{
        TransactionType, UserId,
        category::{CategoryIcon, CategoryName, create_category, get_categories_endpoint},
        db::initialize,
        endpoints,
    };

    use super::CategoriesState;

    fn get_test_server(user_id: &str) -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = UserId::new(user_id);
        for (name, icon, transaction_type) in [
            ("Salary", "💰", TransactionType::Income),
            ("Food", "🍔", TransactionType::Expense),
        ] {
            create_category(
                &user,
                CategoryName::new_unchecked(name),
                CategoryIcon::new_unchecked(icon),
                transaction_type,
                &conn,
            )
            .unwrap();
        }

        let app = Router::new()
            .route(endpoints::CATEGORIES, get(get_categories_endpoint))
            .layer(Extension(user))
            .with_state(CategoriesState {
                db_connection: Arc::new(Mutex::new(conn)),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_all_categories() {
        let server = get_test_server("user_1");

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        let names: Vec<&str> = body.iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Food", "Salary"]);
    }

    #[tokio::test]
    async fn filters_by_type() {
        let server = get_test_server("user_1");

        let response = server
            .get(endpoints::CATEGORIES)
            .add_query_param("type", "income")
            .await;

        response.assert_status_ok();
        let body: Vec<Value> = response.json();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["name"], "Salary");
        assert_eq!(body[0]["type"], "income");
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let server = get_test_server("user_1");

        server
            .get(endpoints::CATEGORIES)
            .add_query_param("type", "transfer")
            .await
            .assert_status_bad_request();
    }
}
