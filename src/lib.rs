//! Expense Tracker is a web app for recording expenses, noting cheaper
//! alternatives to them, and seeing where the money goes.
//!
//! This library provides a JSON API for expenses, alternatives and spending
//! statistics, plus a few server-rendered HTML pages for signing up, logging
//! in and viewing the dashboard.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod alternative;
mod app_state;
mod auth;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod json;
mod landing;
mod logging;
mod not_found;
mod routing;
mod stats;

#[cfg(test)]
mod test_utils;

pub use alternative::{Alternative, AlternativeId, NewAlternative, create_alternative};
pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, create_user};
pub use db::initialize as initialize_db;
pub use expense::{Expense, ExpenseId, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stats::Stats;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The message sent to API clients in place of the details of an internal error.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred, check the server logs for more details.";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing from (or null in) the request body.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field held a value that could not be read as a finite number.
    ///
    /// Callers should pass in the field name and the offending value.
    #[error("Invalid number for field {0}: {1:?}")]
    InvalidNumber(&'static str, String),

    /// The request body could not be parsed into the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A value in the URL path, such as an ID, could not be parsed.
    ///
    /// Holds axum's description of the rejection, e.g. "Invalid URL: ...".
    #[error("{0}")]
    InvalidPath(String),

    /// The route exists but does not accept the request's method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The username and password combination did not match a registered user.
    ///
    /// This deliberately does not say which of the two was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request requires a logged in user but no valid session was found.
    #[error("authentication required")]
    Unauthorized,

    /// The username is already taken by another user.
    #[error("the username is already taken")]
    DuplicateUsername,

    /// The email address is already used by another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The session token could not be written to or read from the cookie.
    #[error("could not encode the session token: {0}")]
    TokenError(String),

    /// The expense ID did not match an expense in the database.
    #[error("Expense not found")]
    ExpenseNotFound,

    /// The alternative ID did not match an alternative in the database.
    #[error("Alternative not found")]
    AlternativeNotFound,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A query was given a foreign key that does not refer to an existing row.
    #[error("a foreign key does not refer to an existing row")]
    InvalidForeignKey,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPath(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidNumber(_, _)
            | Error::InvalidRequestBody(_)
            | Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::DuplicateUsername | Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::ExpenseNotFound | Error::AlternativeNotFound | Error::NotFound => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            INTERNAL_ERROR_MESSAGE.to_owned()
        } else {
            self.to_string()
        };

        (
            status_code,
            Json(json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}
