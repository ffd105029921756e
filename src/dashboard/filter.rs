//! Narrowing the dashboard's expense table with query parameters.

use crate::Expense;

/// The `necessity` query value that shows only necessary expenses.
pub const NECESSARY: &str = "necessary";
/// The `necessity` query value that shows only unnecessary expenses.
pub const UNNECESSARY: &str = "unnecessary";

/// Which expenses to show in the dashboard's expense table.
///
/// A field that is `None` matches every expense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    /// Only show expenses in this category.
    pub category: Option<String>,
    /// Only show necessary (`true`) or unnecessary (`false`) expenses.
    pub is_necessary: Option<bool>,
    /// Only show expenses on this date.
    pub date: Option<String>,
}

impl DashboardFilter {
    /// Build a filter from the raw query values, treating blank values and
    /// unknown necessity values as "any".
    pub fn from_query(
        category: Option<&str>,
        necessity: Option<&str>,
        date: Option<&str>,
    ) -> Self {
        let non_blank = |value: Option<&str>| {
            value
                .filter(|value| !value.trim().is_empty())
                .map(str::to_owned)
        };

        let is_necessary = match necessity {
            Some(NECESSARY) => Some(true),
            Some(UNNECESSARY) => Some(false),
            _ => None,
        };

        Self {
            category: non_blank(category),
            is_necessary,
            date: non_blank(date),
        }
    }

    /// Whether `expense` should be shown.
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category
            .as_ref()
            .is_none_or(|category| *category == expense.category)
            && self
                .is_necessary
                .is_none_or(|is_necessary| is_necessary == expense.is_necessary)
            && self.date.as_ref().is_none_or(|date| *date == expense.date)
    }

    /// Whether any field narrows the table.
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.is_necessary.is_some() || self.date.is_some()
    }
}
