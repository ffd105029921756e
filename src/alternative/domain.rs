//! Core alternative domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::ExpenseId,
    json::{NumberInput, require},
};

/// Database identifier for an alternative.
pub type AlternativeId = i64;

/// A cheaper substitute suggested for a specific expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// The ID of the alternative in the application database.
    pub id: AlternativeId,
    /// The expense this alternative would replace.
    pub expense_id: ExpenseId,
    /// What to do instead, e.g. "Brew at home".
    pub suggestion: String,
    /// How much would be saved by taking the suggestion.
    pub savings: f64,
    /// Any other upsides of the suggestion.
    pub benefits: String,
    /// When the alternative was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The data needed to create an alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlternative {
    /// The expense this alternative would replace.
    pub expense_id: ExpenseId,
    /// What to do instead.
    pub suggestion: String,
    /// How much would be saved.
    pub savings: f64,
    /// Any other upsides of the suggestion.
    pub benefits: String,
}

/// The JSON body for creating an alternative.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternativeData {
    pub expense_id: Option<ExpenseId>,
    pub suggestion: Option<String>,
    pub savings: Option<NumberInput>,
    pub benefits: Option<String>,
}

impl TryFrom<AlternativeData> for NewAlternative {
    type Error = Error;

    fn try_from(data: AlternativeData) -> Result<Self, Self::Error> {
        let expense_id = require(data.expense_id, "expense_id")?;
        let suggestion = require(data.suggestion, "suggestion")?;
        let savings = require(data.savings, "savings")?;

        Ok(Self {
            expense_id,
            suggestion,
            savings: savings.coerce("savings")?,
            benefits: data.benefits.unwrap_or_default(),
        })
    }
}
