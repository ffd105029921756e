//! Database operations for expenses.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::{Expense, ExpenseId, NewExpense},
};

/// Create an expense and return it with its generated ID and creation time.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO expense (description, amount, category, date, is_necessary, notes, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            &new_expense.description,
            new_expense.amount,
            &new_expense.category,
            &new_expense.date,
            new_expense.is_necessary,
            &new_expense.notes,
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        description: new_expense.description,
        amount: new_expense.amount,
        category: new_expense.category,
        date: new_expense.date,
        is_necessary: new_expense.is_necessary,
        notes: new_expense.notes,
        created_at,
    })
}

/// Retrieve a single expense by ID.
///
/// # Errors
///
/// Returns an [Error::ExpenseNotFound] if `expense_id` does not refer to an expense.
pub fn get_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, category, date, is_necessary, notes, created_at
            FROM expense WHERE id = :id;",
        )?
        .query_row(&[(":id", &expense_id)], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::ExpenseNotFound,
            error => error,
        })
}

/// Retrieve all expenses, most recent date first.
///
/// Dates are free-form text, so "most recent" means the greatest string.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, category, date, is_necessary, notes, created_at
            FROM expense ORDER BY date DESC, id DESC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all expenses in the order they were recorded.
pub fn get_expenses_in_recorded_order(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, category, date, is_necessary, notes, created_at
            FROM expense ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the stored expense that has the same ID as `expense`.
///
/// The creation time is never changed.
///
/// # Errors
///
/// Returns an [Error::ExpenseNotFound] if the expense does not exist.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense
        SET description = ?1, amount = ?2, category = ?3, date = ?4, is_necessary = ?5, notes = ?6
        WHERE id = ?7",
        (
            &expense.description,
            expense.amount,
            &expense.category,
            &expense.date,
            expense.is_necessary,
            &expense.notes,
            expense.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::ExpenseNotFound);
    }

    Ok(())
}

/// Delete an expense and, through the foreign key cascade, all of its alternatives.
///
/// # Errors
///
/// Returns an [Error::ExpenseNotFound] if the expense does not exist.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    if rows_affected == 0 {
        return Err(Error::ExpenseNotFound);
    }

    Ok(())
}

/// Initialize the expense table and indexes.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            date TEXT NOT NULL,
            is_necessary INTEGER NOT NULL DEFAULT 1,
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        is_necessary: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}
