//! Expense creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    expense::{NewExpense, create_expense, domain::ExpenseData},
    json::ApiJson,
};

/// The state needed for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create an expense from a JSON body and respond with the stored expense.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    ApiJson(data): ApiJson<ExpenseData>,
) -> Result<Response, Error> {
    let new_expense = NewExpense::try_from(data)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = create_expense(new_expense, &connection)?;
    tracing::debug!("Created expense {}", expense.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Expense added successfully",
            "expense": expense,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod create_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        expense::{domain::ExpenseData, get_all_expenses},
        json::{ApiJson, NumberInput},
        test_utils::parse_json,
    };

    use super::{CreateExpenseState, create_expense_endpoint};

    fn get_state() -> CreateExpenseState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn coffee() -> ExpenseData {
        ExpenseData {
            description: Some("Coffee".to_owned()),
            amount: Some(NumberInput::Number(4.5)),
            category: Some("Food".to_owned()),
            date: Some("2024-01-01".to_owned()),
            is_necessary: Some(false),
            notes: None,
        }
    }

    #[tokio::test]
    async fn can_create_expense() {
        let state = get_state();

        let response = create_expense_endpoint(State(state.clone()), ApiJson(coffee()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Expense added successfully");
        assert_eq!(body["expense"]["description"], "Coffee");
        assert_eq!(body["expense"]["is_necessary"], false);
        assert_eq!(body["expense"]["notes"], "");

        let stored = get_all_expenses(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(body["expense"]["id"], stored[0].id);
        assert_eq!(stored[0].amount, 4.5);
    }

    #[tokio::test]
    async fn amount_can_be_a_numeric_string() {
        let state = get_state();
        let data = ExpenseData {
            amount: Some(NumberInput::Text("19.99".to_owned())),
            ..coffee()
        };

        let response = create_expense_endpoint(State(state), ApiJson(data))
            .await
            .unwrap();

        let body = parse_json(response).await;
        assert_eq!(body["expense"]["amount"], 19.99);
    }

    #[tokio::test]
    async fn missing_field_returns_bad_request_and_persists_nothing() {
        let state = get_state();
        let data = ExpenseData {
            date: None,
            ..coffee()
        };

        let response = create_expense_endpoint(State(state.clone()), ApiJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Missing required field: date");
        assert!(
            get_all_expenses(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn non_numeric_amount_returns_bad_request() {
        let state = get_state();
        let data = ExpenseData {
            amount: Some(NumberInput::Text("a lot".to_owned())),
            ..coffee()
        };

        let response = create_expense_endpoint(State(state), ApiJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
