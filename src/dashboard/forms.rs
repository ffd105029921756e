//! The HTML form handlers behind the dashboard's add and delete buttons.
//!
//! These routes check the session themselves and answer with pages and
//! redirects rather than JSON.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alternative::{AlternativeData, NewAlternative, create_alternative},
    auth::get_logged_in_user,
    dashboard::{DashboardFilter, dashboard_page},
    endpoints,
    expense::{
        ExpenseData, ExpenseId, NewExpense, create_expense, delete_expense, get_expense,
    },
    html::NoticeKind,
    internal_server_error::InternalServerError,
    json::NumberInput,
};

/// The state needed by the dashboard's forms.
#[derive(Debug, Clone)]
pub struct DashboardFormState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<DashboardFormState> for Key {
    fn from_ref(state: &DashboardFormState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for adding an expense.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseForm {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    /// "true" or "false".
    pub is_necessary: Option<String>,
    pub notes: Option<String>,
}

impl From<ExpenseForm> for ExpenseData {
    fn from(form: ExpenseForm) -> Self {
        Self {
            description: form.description,
            amount: form.amount.map(NumberInput::Text),
            category: form.category,
            date: form.date,
            is_necessary: form.is_necessary.map(|value| value != "false"),
            notes: form.notes,
        }
    }
}

/// The form data for suggesting an alternative.
#[derive(Debug, Default, Deserialize)]
pub struct AlternativeForm {
    pub expense_id: Option<ExpenseId>,
    pub suggestion: Option<String>,
    pub savings: Option<String>,
    pub benefits: Option<String>,
}

impl From<AlternativeForm> for AlternativeData {
    fn from(form: AlternativeForm) -> Self {
        Self {
            expense_id: form.expense_id,
            suggestion: form.suggestion,
            savings: form.savings.map(NumberInput::Text),
            benefits: form.benefits,
        }
    }
}

/// Record an expense from the dashboard, then go back to the dashboard.
pub async fn post_expense_form(
    State(state): State<DashboardFormState>,
    jar: PrivateCookieJar,
    Form(form): Form<ExpenseForm>,
) -> Response {
    handle_dashboard_form(&state, &jar, |connection| {
        let new_expense = NewExpense::try_from(ExpenseData::from(form))?;
        let expense = create_expense(new_expense, connection)?;
        tracing::debug!("Created expense {} from the dashboard", expense.id);

        Ok(())
    })
}

/// Delete an expense, and its alternatives, from the dashboard.
pub async fn post_delete_expense_form(
    State(state): State<DashboardFormState>,
    jar: PrivateCookieJar,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    handle_dashboard_form(&state, &jar, |connection| {
        delete_expense(expense_id, connection)?;
        tracing::debug!("Deleted expense {expense_id} from the dashboard");

        Ok(())
    })
}

/// Suggest an alternative for an expense from the dashboard.
pub async fn post_alternative_form(
    State(state): State<DashboardFormState>,
    jar: PrivateCookieJar,
    Form(form): Form<AlternativeForm>,
) -> Response {
    handle_dashboard_form(&state, &jar, |connection| {
        let new_alternative = NewAlternative::try_from(AlternativeData::from(form))?;
        get_expense(new_alternative.expense_id, connection)?;
        let alternative = create_alternative(new_alternative, connection)?;
        tracing::debug!(
            "Created alternative {} for expense {} from the dashboard",
            alternative.id,
            alternative.expense_id
        );

        Ok(())
    })
}

/// Run `action` for the logged in user.
///
/// Visitors without a session are sent to the log-in page. On success the
/// user is redirected to the dashboard. Client errors re-render the dashboard
/// with the error message and the error's status code.
fn handle_dashboard_form(
    state: &DashboardFormState,
    jar: &PrivateCookieJar,
    action: impl FnOnce(&Connection) -> Result<(), Error>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let user = match get_logged_in_user(jar, &connection) {
        Ok(Some(user)) => user,
        Ok(None) => return Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => {
            tracing::error!("Could not load the logged in user: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let error = match action(&connection) {
        Ok(()) => return Redirect::to(endpoints::ROOT).into_response(),
        Err(error) => error,
    };

    let status_code = error.status_code();

    if !status_code.is_client_error() {
        tracing::error!("Could not handle dashboard form: {error}");
        return InternalServerError::default().into_response();
    }

    let message = error.to_string();

    match dashboard_page(
        &user,
        &connection,
        &DashboardFilter::default(),
        Some((NoticeKind::Error, &message)),
    ) {
        Ok(page) => (status_code, page).into_response(),
        Err(error) => {
            tracing::error!("Could not render the dashboard: {error}");
            InternalServerError::default().into_response()
        }
    }
}
