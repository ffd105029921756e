//! Alternative creation endpoint.

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
    alternative::{NewAlternative, create_alternative, domain::AlternativeData},
    expense::get_expense,
    json::ApiJson,
};

/// The state needed for creating an alternative.
#[derive(Debug, Clone)]
pub struct CreateAlternativeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAlternativeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Attach a new alternative to an existing expense.
pub async fn create_alternative_endpoint(
    State(state): State<CreateAlternativeState>,
    ApiJson(data): ApiJson<AlternativeData>,
) -> Result<Response, Error> {
    let new_alternative = NewAlternative::try_from(data)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expense(new_alternative.expense_id, &connection)?;
    let alternative = create_alternative(new_alternative, &connection)?;
    tracing::debug!(
        "Created alternative {} for expense {}",
        alternative.id,
        alternative.expense_id
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Alternative added successfully",
            "alternative": alternative,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod create_alternative_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        alternative::{domain::AlternativeData, get_all_alternatives},
        db::initialize,
        expense::{NewExpense, create_expense},
        json::{ApiJson, NumberInput},
        test_utils::parse_json,
    };

    use super::{CreateAlternativeState, create_alternative_endpoint};

    fn get_state_with_expense() -> (CreateAlternativeState, i64) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");
        let expense = create_expense(
            NewExpense {
                description: "Coffee".to_owned(),
                amount: 4.5,
                category: "Food".to_owned(),
                date: "2024-01-01".to_owned(),
                is_necessary: false,
                notes: String::new(),
            },
            &connection,
        )
        .expect("Could not create test expense");

        let state = CreateAlternativeState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, expense.id)
    }

    #[tokio::test]
    async fn create_alternative_endpoint_succeeds() {
        let (state, expense_id) = get_state_with_expense();
        let data = AlternativeData {
            expense_id: Some(expense_id),
            suggestion: Some("Brew at home".to_owned()),
            savings: Some(NumberInput::Number(3.0)),
            benefits: None,
        };

        let response = create_alternative_endpoint(State(state.clone()), ApiJson(data))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Alternative added successfully");
        assert_eq!(body["alternative"]["expense_id"], expense_id);
        assert_eq!(body["alternative"]["savings"], 3.0);
        assert_eq!(body["alternative"]["benefits"], "");

        let alternatives = get_all_alternatives(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(alternatives.len(), 1);
    }

    #[tokio::test]
    async fn missing_expense_returns_not_found_and_persists_nothing() {
        let (state, expense_id) = get_state_with_expense();
        let data = AlternativeData {
            expense_id: Some(expense_id + 100),
            suggestion: Some("Brew at home".to_owned()),
            savings: Some(NumberInput::Number(3.0)),
            benefits: None,
        };

        let response = create_alternative_endpoint(State(state.clone()), ApiJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json(response).await;
        assert_eq!(body["error"], "Expense not found");
        assert!(
            get_all_alternatives(&state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn missing_suggestion_returns_bad_request() {
        let (state, expense_id) = get_state_with_expense();
        let data = AlternativeData {
            expense_id: Some(expense_id),
            savings: Some(NumberInput::Number(3.0)),
            ..Default::default()
        };

        let response = create_alternative_endpoint(State(state), ApiJson(data))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json(response).await;
        assert_eq!(body["error"], "Missing required field: suggestion");
    }
}
