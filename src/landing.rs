//! The landing page at `/`, which shows the dashboard, log-in or sign-up page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    auth::{get_logged_in_user, log_in_page, sign_up_page},
    dashboard::{DashboardFilter, dashboard_page},
    endpoints,
    internal_server_error::InternalServerError,
};

/// The state needed for the landing page.
#[derive(Debug, Clone)]
pub struct LandingState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LandingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LandingState> for Key {
    fn from_ref(state: &LandingState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LandingQuery {
    pub view: Option<String>,
    /// Dashboard filter: only show expenses in this category.
    pub category: Option<String>,
    /// Dashboard filter: "necessary" or "unnecessary".
    pub necessity: Option<String>,
    /// Dashboard filter: only show expenses on this date.
    pub date: Option<String>,
}

/// Show the dashboard to logged in users, otherwise the log-in page, or the
/// sign-up page when `?view=signup` is given.
///
/// The `category`, `necessity` and `date` query parameters filter the
/// dashboard's expense table.
pub async fn get_landing_page(
    State(state): State<LandingState>,
    jar: PrivateCookieJar,
    Query(query): Query<LandingQuery>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let user = match get_logged_in_user(&jar, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("Could not load the logged in user: {error}");
            return InternalServerError::default().into_response();
        }
    };

    let filter = DashboardFilter::from_query(
        query.category.as_deref(),
        query.necessity.as_deref(),
        query.date.as_deref(),
    );

    match user {
        Some(user) => match dashboard_page(&user, &connection, &filter, None) {
            Ok(page) => page.into_response(),
            Err(error) => {
                tracing::error!("Could not render the dashboard: {error}");
                InternalServerError {
                    description: "Could not load your expenses.",
                    fix: "Try again later or check the server logs",
                }
                .into_response()
            }
        },
        None if query.view.as_deref() == Some(endpoints::SIGN_UP_VIEW) => {
            sign_up_page("", "", None).into_response()
        }
        None => log_in_page("", None).into_response(),
    }
}
