use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{
    NewAlternative, NewExpense, PasswordHash, create_alternative, create_expense, create_user,
    initialize_db,
};

/// A utility for creating a test database for the expense_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::from_raw_password("test", PasswordHash::DEFAULT_COST)?;
    create_user("test", "test@example.com", password_hash, &conn)?;

    println!("Creating sample expenses...");

    let samples = [
        ("Coffee", 4.5, "Food", "2024-01-01", false, "Flat white on the way to work"),
        ("Groceries", 52.1, "Food", "2024-01-02", true, ""),
        ("Bus fare", 2.4, "Transport", "2024-01-02", true, ""),
        ("Streaming subscription", 15.99, "Entertainment", "2024-01-05", false, ""),
        ("Taxi home", 28.0, "Transport", "2024-01-06", false, "Missed the last bus"),
    ];

    let mut expenses = Vec::with_capacity(samples.len());
    for (description, amount, category, date, is_necessary, notes) in samples {
        let expense = create_expense(
            NewExpense {
                description: description.to_owned(),
                amount,
                category: category.to_owned(),
                date: date.to_owned(),
                is_necessary,
                notes: notes.to_owned(),
            },
            &conn,
        )?;
        expenses.push(expense);
    }

    println!("Creating sample alternatives...");

    let suggestions = [
        (0, "Brew coffee at home", 3.5, "Cheaper and no queue"),
        (3, "Share a family plan", 8.0, ""),
        (4, "Leave before the last bus", 25.6, "Earlier night"),
    ];

    for (expense_index, suggestion, savings, benefits) in suggestions {
        create_alternative(
            NewAlternative {
                expense_id: expenses[expense_index].id,
                suggestion: suggestion.to_owned(),
                savings,
                benefits: benefits.to_owned(),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
