//! A personal finance tracker that records income and expense transactions
//! against user-defined categories and keeps per-day and per-month totals
//! up to date on every write.
//!
//! This library provides a JSON REST API. Users are identified by an upstream
//! identity provider that forwards the user ID in a request header.

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod config;
mod database_id;
mod date;
mod db;
pub mod endpoints;
mod error;
mod history;
mod identity;
mod logging;
mod money;
mod routing;
mod stats;
mod timezone;
mod transaction;
mod transaction_type;
mod user;
mod user_settings;

pub use app_state::AppState;
pub use category::{Category, CategoryIcon, CategoryName, create_category, find_category};
pub use config::{
    DEFAULT_IDENTITY_HEADER, DEFAULT_MAX_RANGE_DAYS, IdentityConfig, ReportingConfig,
};
pub use db::initialize as initialize_db;
pub use error::{Error, ValidationError};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use money::Money;
pub use routing::build_router;
pub use stats::{
    Balance, CategoryShare, CategoryTotal, category_shares, get_balance, get_category_breakdown,
};
pub use transaction::{
    Transaction, TransactionRequest, count_transactions, get_transaction, record_transaction,
};
pub use transaction_type::TransactionType;
pub use user::UserId;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
