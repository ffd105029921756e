use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, alternative::get_all_alternatives};

/// The state needed for listing alternatives.
#[derive(Debug, Clone)]
pub struct ListAlternativesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListAlternativesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with every stored alternative, newest first.
pub async fn list_alternatives_endpoint(
    State(state): State<ListAlternativesState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let alternatives = get_all_alternatives(&connection)?;

    Ok(Json(json!({
        "success": true,
        "alternatives": alternatives,
    }))
    .into_response())
}
