//! The categories transactions are recorded against.
//!
//! Categories are read by the ingestion engine to snapshot a transaction's
//! category name and icon. Creating categories is only exposed to seeding and
//! tests, the HTTP API lists them.

mod db;
mod domain;
mod list;

pub use db::{create_category, create_category_table, find_category, get_categories};
pub use domain::{Category, CategoryIcon, CategoryName};
pub use list::get_categories_endpoint;
