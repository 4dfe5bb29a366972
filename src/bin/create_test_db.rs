use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use budget_tracker::{
    CategoryIcon, CategoryName, TransactionRequest, TransactionType, UserId, create_category,
    initialize_db, record_transaction,
};

/// A utility for creating a test database for the budget tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user ID to create the categories and transactions for.
    #[arg(long, short, default_value = "test_user")]
    user_id: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let user_id = UserId::new(&args.user_id);

    println!("Creating categories for {user_id}...");
    for (name, icon, transaction_type) in [
        ("Salary", "💰", TransactionType::Income),
        ("Gifts", "🎁", TransactionType::Income),
        ("Food", "🍔", TransactionType::Expense),
        ("Transport", "🚌", TransactionType::Expense),
        ("Rent", "🏠", TransactionType::Expense),
    ] {
        create_category(
            &user_id,
            CategoryName::new(name)?,
            CategoryIcon::new(icon)?,
            transaction_type,
            &conn,
        )?;
    }

    println!("Creating transactions...");
    for (amount, transaction_type, category, date, description) in [
        (3200.0, "income", "Salary", "2024-03-01", "March pay"),
        (1200.0, "expense", "Rent", "2024-03-02", "Rent"),
        (45.5, "expense", "Food", "2024-03-03", "Groceries"),
        (12.0, "expense", "Transport", "2024-03-04", "Bus card top up"),
        (50.0, "income", "Gifts", "2024-03-10", "Birthday"),
        (3200.0, "income", "Salary", "2024-04-01", "April pay"),
        (1200.0, "expense", "Rent", "2024-04-02", "Rent"),
    ] {
        record_transaction(
            &user_id,
            TransactionRequest::new(amount, transaction_type, category, date)
                .description(description),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
