//! The sign-up page and the handler for creating new users.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    auth::{create_user, log_in_page},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, NoticeKind, base, log_in_register, notice,
        password_input, text_input,
    },
    internal_server_error::InternalServerError,
};

const MISSING_FIELDS_ERROR_MSG: &str = "Please fill in your username, email and password.";
const ACCOUNT_EXISTS_ERROR_MSG: &str =
    "Could not create account. Try a different username or email.";
const ACCOUNT_CREATED_MSG: &str = "Account created, you can now log in.";

fn sign_up_form(username: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::SIGN_UP)
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                (notice(NoticeKind::Error, error_message))
            }

            (text_input("Username", "username", "text", username, true))
            (text_input("Email", "email", "email", email, false))
            (password_input())

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Sign up"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::ROOT) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Render the full sign-up page.
pub fn sign_up_page(username: &str, email: &str, error_message: Option<&str>) -> Markup {
    let form = sign_up_form(username, email, error_message);
    let content = log_in_register("Create an account", &form);
    base("Sign Up", &content)
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignUpData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Handler for sign-up requests via the POST method.
///
/// A new account does not log the user in, the log-in page is shown with a
/// success notice instead.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    Form(user_data): Form<SignUpData>,
) -> Response {
    let username = user_data.username.trim();
    let email = user_data.email.trim();

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) if !username.is_empty() && !email.is_empty() => password,
        _ => {
            return sign_up_page(username, email, Some(MISSING_FIELDS_ERROR_MSG)).into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    match create_user(username, email, password_hash, &connection) {
        Ok(user) => {
            tracing::info!("Created user {}", user.id);
            log_in_page(
                &user.username,
                Some((NoticeKind::Success, ACCOUNT_CREATED_MSG)),
            )
            .into_response()
        }
        Err(Error::DuplicateUsername | Error::DuplicateEmail) => {
            sign_up_page(username, email, Some(ACCOUNT_EXISTS_ERROR_MSG)).into_response()
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            InternalServerError::default().into_response()
        }
    }
}

#[cfg(test)]
mod sign_up_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::Response};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        PasswordHash,
        auth::{create_user, get_user_by_username},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{
        ACCOUNT_CREATED_MSG, ACCOUNT_EXISTS_ERROR_MSG, MISSING_FIELDS_ERROR_MSG, SignUpData,
        SignUpState, post_sign_up, sign_up_page,
    };

    fn get_state() -> SignUpState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        SignUpState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn sign_up_data(username: &str, email: &str, password: &str) -> SignUpData {
        SignUpData {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    async fn get_alert_text(response: Response) -> String {
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        document
            .select(&Selector::parse("p[role=alert]").unwrap())
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[test]
    fn sign_up_page_displays_form() {
        let document = scraper::Html::parse_document(&sign_up_page("", "", None).into_string());
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_eq!(form.value().attr("action"), Some(endpoints::SIGN_UP));
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn sign_up_creates_user_and_shows_log_in_page() {
        let state = get_state();

        let response = post_sign_up(
            State(state.clone()),
            Form(sign_up_data("alice", "alice@example.com", "correct horse")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_alert_text(response).await, ACCOUNT_CREATED_MSG);

        let user = get_user_by_username("alice", &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.password_hash.verify("correct horse").unwrap());
    }

    #[tokio::test]
    async fn missing_field_rerenders_form() {
        let state = get_state();

        let response = post_sign_up(
            State(state.clone()),
            Form(sign_up_data("alice", "", "correct horse")),
        )
        .await;

        assert_eq!(get_alert_text(response).await, MISSING_FIELDS_ERROR_MSG);
        assert!(get_user_by_username("alice", &state.db_connection.lock().unwrap()).is_err());
    }

    #[tokio::test]
    async fn duplicate_sign_up_keeps_original_credentials() {
        let state = get_state();
        let original = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::from_raw_password("original password", 4).unwrap(),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        for data in [
            sign_up_data("alice", "new@example.com", "new password"),
            sign_up_data("bob", "alice@example.com", "new password"),
        ] {
            let response = post_sign_up(State(state.clone()), Form(data)).await;

            assert_eq!(get_alert_text(response).await, ACCOUNT_EXISTS_ERROR_MSG);
        }

        let connection = state.db_connection.lock().unwrap();
        let stored = get_user_by_username("alice", &connection).unwrap();
        assert_eq!(stored, original);
        assert!(stored.password_hash.verify("original password").unwrap());
        assert!(get_user_by_username("bob", &connection).is_err());
    }
}
