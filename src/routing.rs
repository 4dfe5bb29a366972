//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::{
    AppState,
    category::get_categories_endpoint,
    endpoints,
    history::{get_history_periods_endpoint, get_month_history_endpoint, get_year_history_endpoint},
    identity::{IdentityState, identity_guard},
    stats::{get_balance_endpoint, get_category_breakdown_endpoint},
    transaction::create_transaction_endpoint,
    user_settings::{get_user_settings_endpoint, update_user_settings_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every route requires a resolved user identity.
pub fn build_router(state: AppState) -> Router {
    let identity_state = IdentityState {
        identity_config: state.identity_config.clone(),
    };

    Router::new()
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint))
        .route(endpoints::BALANCE_STATS, get(get_balance_endpoint))
        .route(
            endpoints::CATEGORY_STATS,
            get(get_category_breakdown_endpoint),
        )
        .route(
            endpoints::HISTORY_PERIODS,
            get(get_history_periods_endpoint),
        )
        .route(endpoints::YEAR_HISTORY, get(get_year_history_endpoint))
        .route(endpoints::MONTH_HISTORY, get(get_month_history_endpoint))
        .route(
            endpoints::USER_SETTINGS,
            get(get_user_settings_endpoint).put(update_user_settings_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(
            identity_state,
            identity_guard,
        ))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}
