//! Spending statistics computed over all expenses and alternatives.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    Alternative, AppState, Error, Expense, alternative::get_all_alternatives,
    expense::get_expenses_in_recorded_order,
};

/// Aggregate figures for the dashboard and the stats API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    /// Sum of all expense amounts.
    pub total: f64,
    /// Sum of the amounts of necessary expenses.
    pub necessary: f64,
    /// Sum of the amounts of unnecessary expenses.
    pub unnecessary: f64,
    /// Sum of the savings of all alternatives.
    pub potential_savings: f64,
    /// Total spent per category, in the order categories were first seen.
    pub categories: CategoryTotals,
    /// Number of expenses.
    pub expense_count: usize,
}

/// Per-category totals that keep insertion order.
///
/// Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals(Vec<(String, f64)>);

impl CategoryTotals {
    fn add(&mut self, category: &str, amount: f64) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => *total += amount,
            None => self.0.push((category.to_owned(), amount)),
        }
    }

    /// Iterate over `(category, total)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (category, total) in &self.0 {
            map.serialize_entry(category, total)?;
        }

        map.end()
    }
}

/// Compute statistics from `expenses` and `alternatives`.
///
/// Categories are listed in the order they first appear in `expenses`.
pub fn compute_stats(expenses: &[Expense], alternatives: &[Alternative]) -> Stats {
    let mut stats = Stats {
        expense_count: expenses.len(),
        ..Default::default()
    };

    for expense in expenses {
        stats.total += expense.amount;

        if expense.is_necessary {
            stats.necessary += expense.amount;
        } else {
            stats.unnecessary += expense.amount;
        }

        stats.categories.add(&expense.category, expense.amount);
    }

    // `Sum` for floats starts at -0.0, which would be sent as "-0.0".
    stats.potential_savings = alternatives
        .iter()
        .fold(0.0, |total, alternative| total + alternative.savings);

    stats
}

/// Load every expense and alternative and compute their statistics.
///
/// Expenses are scanned in the order they were recorded, so categories appear
/// in the order they were first used.
pub fn get_stats(connection: &Connection) -> Result<Stats, Error> {
    let expenses = get_expenses_in_recorded_order(connection)?;
    let alternatives = get_all_alternatives(connection)?;

    Ok(compute_stats(&expenses, &alternatives))
}

/// The state needed for the stats endpoint.
#[derive(Debug, Clone)]
pub struct StatsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a successful stats response.
///
/// This is serialized directly rather than through [serde_json::Value] so that
/// the category order survives.
#[derive(Debug, Serialize)]
struct StatsResponse {
    success: bool,
    stats: Stats,
}

/// Respond with the current spending statistics.
pub async fn get_stats_endpoint(State(state): State<StatsState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let stats = get_stats(&connection)?;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    })
    .into_response())
}
