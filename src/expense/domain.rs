//! Core expense domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    json::{NumberInput, require},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// A single spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense in the application database.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub description: String,
    /// How much was spent.
    pub amount: f64,
    /// A free-form category name, e.g. "Food".
    pub category: String,
    /// When the money was spent.
    ///
    /// This is stored as given by the client and is not validated as a date.
    pub date: String,
    /// Whether the expense was needed, as opposed to a want.
    pub is_necessary: bool,
    /// Any extra notes about the expense.
    pub notes: String,
    /// When the expense was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to create an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// What the money was spent on.
    pub description: String,
    /// How much was spent.
    pub amount: f64,
    /// A free-form category name.
    pub category: String,
    /// When the money was spent.
    pub date: String,
    /// Whether the expense was needed.
    pub is_necessary: bool,
    /// Any extra notes about the expense.
    pub notes: String,
}

/// The JSON body for creating or updating an expense.
///
/// When creating an expense, `description`, `amount`, `category` and `date`
/// are required. When updating, every field is optional and missing fields
/// keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpenseData {
    pub description: Option<String>,
    pub amount: Option<NumberInput>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub is_necessary: Option<bool>,
    pub notes: Option<String>,
}

impl TryFrom<ExpenseData> for NewExpense {
    type Error = Error;

    fn try_from(data: ExpenseData) -> Result<Self, Self::Error> {
        let description = require(data.description, "description")?;
        let amount = require(data.amount, "amount")?;
        let category = require(data.category, "category")?;
        let date = require(data.date, "date")?;

        Ok(Self {
            description,
            amount: amount.coerce("amount")?,
            category,
            date,
            is_necessary: data.is_necessary.unwrap_or(true),
            notes: data.notes.unwrap_or_default(),
        })
    }
}

impl ExpenseData {
    /// Overwrite the fields of `expense` with the fields that are set in `self`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidNumber] if the amount is set but is not a number.
    pub fn apply_to(self, expense: Expense) -> Result<Expense, Error> {
        let amount = match self.amount {
            Some(amount) => amount.coerce("amount")?,
            None => expense.amount,
        };

        Ok(Expense {
            description: self.description.unwrap_or(expense.description),
            amount,
            category: self.category.unwrap_or(expense.category),
            date: self.date.unwrap_or(expense.date),
            is_necessary: self.is_necessary.unwrap_or(expense.is_necessary),
            notes: self.notes.unwrap_or(expense.notes),
            ..expense
        })
    }
}
