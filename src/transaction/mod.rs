//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction`
//! - Recording transactions together with their aggregate increments
//! - The endpoint for recording transactions

mod core;
mod create_endpoint;
mod ingestion;

pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction_table, get_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use ingestion::{TransactionRequest, record_transaction};
