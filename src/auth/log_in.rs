//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex, OnceLock};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, get_user_by_username, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, NoticeKind, base, log_in_register, notice,
        password_input, text_input,
    },
    internal_server_error::InternalServerError,
};

/// The message shown for an unknown username or a wrong password.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid credentials";

fn log_in_form(username: &str, message: Option<(NoticeKind, &str)>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN)
            class="space-y-4 md:space-y-6"
        {
            @if let Some((kind, message)) = message {
                (notice(kind, message))
            }

            (text_input("Username", "username", "text", username, true))
            (password_input())

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::SIGN_UP_PAGE) tabindex="0" class=(LINK_STYLE)
                {
                  "Sign up here"
                }
            }
        }
    }
}

/// Render the full log-in page, optionally with a message above the form.
pub fn log_in_page(username: &str, message: Option<(NoticeKind, &str)>) -> Markup {
    let form = log_in_form(username, message);
    let content = log_in_register("Log in to your account", &form);
    base("Log In", &content)
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
///
/// Missing fields are read as empty strings, which never match a user.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the landing page. Otherwise, the log-in page is shown again
/// with an error message that does not reveal whether the username exists.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return InternalServerError::default().into_response();
            }
        };

        match get_user_by_username(&user_data.username, &connection) {
            Ok(user) => Some(user),
            Err(Error::NotFound) => None,
            Err(error) => {
                tracing::error!("Unhandled error while verifying credentials: {error}");
                return InternalServerError::default().into_response();
            }
        }
    };

    let user = match user {
        Some(user) => match user.password_hash.verify(&user_data.password) {
            Ok(true) => user,
            Ok(false) => return invalid_credentials(&user_data.username),
            Err(error) => {
                tracing::error!("Unhandled error while verifying credentials: {error}");
                return InternalServerError::default().into_response();
            }
        },
        None => {
            // Unknown usernames must take as long to reject as wrong passwords.
            if let Some(hash) = dummy_password_hash() {
                let _ = hash.verify(&user_data.password);
            }

            return invalid_credentials(&user_data.username);
        }
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            (jar, Redirect::to(endpoints::ROOT)).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            InternalServerError::default().into_response()
        }
    }
}

/// A hash of a password nobody has, checked against when the username is unknown.
fn dummy_password_hash() -> Option<&'static PasswordHash> {
    static DUMMY_HASH: OnceLock<Option<PasswordHash>> = OnceLock::new();

    DUMMY_HASH
        .get_or_init(|| {
            PasswordHash::from_raw_password(
                "a password for users that do not exist",
                PasswordHash::DEFAULT_COST,
            )
            .inspect_err(|error| tracing::error!("Could not hash the dummy password: {error}"))
            .ok()
        })
        .as_ref()
}

fn invalid_credentials(username: &str) -> Response {
    log_in_page(
        username,
        Some((NoticeKind::Error, INVALID_CREDENTIALS_ERROR_MSG)),
    )
    .into_response()
}
