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
    alternative::{AlternativeId, delete_alternative},
    json::ApiPath,
};

/// The state needed for deleting an alternative.
#[derive(Debug, Clone)]
pub struct DeleteAlternativeState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAlternativeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a single alternative. The expense it belongs to is unaffected.
pub async fn delete_alternative_endpoint(
    ApiPath(alternative_id): ApiPath<AlternativeId>,
    State(state): State<DeleteAlternativeState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_alternative(alternative_id, &connection)?;

    Ok(Json(json!({
        "success": true,
        "message": "Alternative deleted successfully",
    }))
    .into_response())
}
