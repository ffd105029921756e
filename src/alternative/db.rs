//! Database operations for alternatives.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    alternative::{Alternative, AlternativeId, NewAlternative},
};

/// Create an alternative and return it with its generated ID and creation time.
///
/// # Errors
///
/// Returns an [Error::ExpenseNotFound] if the alternative's expense does not exist.
pub fn create_alternative(
    new_alternative: NewAlternative,
    connection: &Connection,
) -> Result<Alternative, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO alternative (expense_id, suggestion, savings, benefits, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5);",
            (
                new_alternative.expense_id,
                &new_alternative.suggestion,
                new_alternative.savings,
                &new_alternative.benefits,
                created_at,
            ),
        )
        .map_err(|error| match Error::from(error) {
            Error::InvalidForeignKey => Error::ExpenseNotFound,
            error => error,
        })?;

    let id = connection.last_insert_rowid();

    Ok(Alternative {
        id,
        expense_id: new_alternative.expense_id,
        suggestion: new_alternative.suggestion,
        savings: new_alternative.savings,
        benefits: new_alternative.benefits,
        created_at,
    })
}

/// Retrieve all alternatives, most recently created first.
pub fn get_all_alternatives(connection: &Connection) -> Result<Vec<Alternative>, Error> {
    connection
        .prepare(
            "SELECT id, expense_id, suggestion, savings, benefits, created_at
            FROM alternative ORDER BY created_at DESC, id DESC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_alternative| maybe_alternative.map_err(|error| error.into()))
        .collect()
}

/// Delete an alternative by ID.
///
/// # Errors
///
/// Returns an [Error::AlternativeNotFound] if the alternative does not exist.
pub fn delete_alternative(
    alternative_id: AlternativeId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM alternative WHERE id = ?1", [alternative_id])?;

    if rows_affected == 0 {
        return Err(Error::AlternativeNotFound);
    }

    Ok(())
}

/// Initialize the alternative table and indexes.
///
/// The expense table must exist before this table is created.
pub fn create_alternative_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS alternative (
            id INTEGER PRIMARY KEY,
            expense_id INTEGER NOT NULL,
            suggestion TEXT NOT NULL,
            savings REAL NOT NULL,
            benefits TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            FOREIGN KEY(expense_id) REFERENCES expense(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_alternative_expense_id ON alternative(expense_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Alternative, rusqlite::Error> {
    Ok(Alternative {
        id: row.get(0)?,
        expense_id: row.get(1)?,
        suggestion: row.get(2)?,
        savings: row.get(3)?,
        benefits: row.get(4)?,
        created_at: row.get(5)?,
    })
}
