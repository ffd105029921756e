//! Expense update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    expense::{ExpenseId, domain::ExpenseData, get_expense, update_expense},
    json::{ApiJson, ApiPath},
};

/// The state needed for updating an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to an expense and respond with the updated expense.
///
/// Fields missing from the body keep their stored value.
pub async fn update_expense_endpoint(
    ApiPath(expense_id): ApiPath<ExpenseId>,
    State(state): State<UpdateExpenseState>,
    ApiJson(data): ApiJson<ExpenseData>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)?;
    let expense = data.apply_to(expense)?;
    update_expense(&expense, &connection)?;

    Ok(Json(json!({
        "success": true,
        "message": "Expense updated successfully",
        "expense": expense,
    }))
    .into_response())
}

#[cfg(test)]
mod update_expense_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        Expense,
        db::initialize,
        expense::{NewExpense, create_expense, domain::ExpenseData, get_expense},
        json::{ApiJson, ApiPath, NumberInput},
        test_utils::parse_json,
    };

    use super::{UpdateExpenseState, update_expense_endpoint};

    fn get_state_with_expense() -> (UpdateExpenseState, Expense) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let expense = create_expense(
            NewExpense {
                description: "Gym".to_owned(),
                amount: 60.0,
                category: "Health".to_owned(),
                date: "2024-03-01".to_owned(),
                is_necessary: true,
                notes: "Monthly".to_owned(),
            },
            &connection,
        )
        .expect("Could not create test expense");

        let state = UpdateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, expense)
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (state, expense) = get_state_with_expense();
        let data = ExpenseData {
            amount: Some(NumberInput::Number(45.0)),
            is_necessary: Some(false),
            ..Default::default()
        };

        let response = update_expense_endpoint(ApiPath(expense.id), State(state.clone()), ApiJson(data))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json(response).await;
        assert_eq!(body["message"], "Expense updated successfully");
        assert_eq!(body["expense"]["amount"], 45.0);

        let stored = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(
            stored,
            Expense {
                amount: 45.0,
                is_necessary: false,
                ..expense
            }
        );
    }

    #[tokio::test]
    async fn full_update_is_idempotent() {
        let (state, expense) = get_state_with_expense();
        let data = ExpenseData {
            description: Some("Swimming pool".to_owned()),
            amount: Some(NumberInput::Text("12".to_owned())),
            category: Some("Health".to_owned()),
            date: Some("2024-03-02".to_owned()),
            is_necessary: Some(false),
            notes: Some("Casual entry".to_owned()),
        };

        update_expense_endpoint(
            ApiPath(expense.id),
            State(state.clone()),
            ApiJson(data.clone()),
        )
        .await
        .unwrap();
        let once = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();

        update_expense_endpoint(ApiPath(expense.id), State(state.clone()), ApiJson(data))
            .await
            .unwrap();
        let twice = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.description, "Swimming pool");
        assert_eq!(once.created_at, expense.created_at);
    }

    #[tokio::test]
    async fn unknown_id_returns_not_found() {
        let (state, expense) = get_state_with_expense();

        let response = update_expense_endpoint(
            ApiPath(expense.id + 1),
            State(state),
            ApiJson(ExpenseData::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json(response).await;
        assert_eq!(body["error"], "Expense not found");
    }

    #[tokio::test]
    async fn invalid_amount_leaves_expense_unchanged() {
        let (state, expense) = get_state_with_expense();
        let data = ExpenseData {
            description: Some("Changed".to_owned()),
            amount: Some(NumberInput::Text("free".to_owned())),
            ..Default::default()
        };

        let response = update_expense_endpoint(ApiPath(expense.id), State(state.clone()), ApiJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let stored = get_expense(expense.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored, expense);
    }
}
