//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use axum_extra::extract::PrivateCookieJar;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash, auth::get_token_from_cookies};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with. Unique.
    pub username: String,
    /// The user's email address. Unique.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUsername] if `username` is already taken,
/// - [Error::DuplicateEmail] if `email` is already in use,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3)",
        (username, email, password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user with the given `username`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has that username.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE username = :username")?
        .query_row(&[(":username", username)], map_row)
        .map_err(|error| error.into())
}

/// Get the user whose session cookie is in `jar`.
///
/// Returns `Ok(None)` when there is no valid session, or the session belongs
/// to a user that no longer exists.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the user could not be loaded.
pub(crate) fn get_logged_in_user(
    jar: &PrivateCookieJar,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    let Ok(token) = get_token_from_cookies(jar) else {
        return Ok(None);
    };

    match get_user_by_id(token.user_id, connection) {
        Ok(user) => Ok(Some(user)),
        Err(Error::NotFound) => {
            tracing::warn!("Session for unknown user {}", token.user_id);
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod user_tests {
    use axum_extra::extract::PrivateCookieJar;
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        app_state::create_cookie_key,
        auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
    };

    use super::{
        UserID, create_user, create_user_table, get_logged_in_user, get_user_by_id,
        get_user_by_username,
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user =
            create_user("alice", "alice@example.com", password_hash.clone(), &db_connection)
                .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(inserted_user.email, "alice@example.com");
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let db_connection = get_db_connection();
        create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            "alice",
            "someone.else@example.com",
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn insert_duplicate_email_fails() {
        let db_connection = get_db_connection();
        create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            "bob",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_succeeds_with_existing_id() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_id(test_user.id, &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn get_user_by_username_succeeds() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(
            get_user_by_username("alice", &db_connection),
            Ok(test_user)
        );
        assert_eq!(
            get_user_by_username("bob", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn logged_in_user_comes_from_session_cookie() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "alice",
            "alice@example.com",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();
        let key = create_cookie_key("a user test secret");
        let empty_jar = PrivateCookieJar::new(key.clone());
        let jar = set_auth_cookie(empty_jar.clone(), test_user.id, DEFAULT_COOKIE_DURATION).unwrap();
        let stale_jar =
            set_auth_cookie(empty_jar.clone(), UserID::new(404), DEFAULT_COOKIE_DURATION).unwrap();

        assert_eq!(get_logged_in_user(&jar, &db_connection), Ok(Some(test_user)));
        assert_eq!(get_logged_in_user(&empty_jar, &db_connection), Ok(None));
        assert_eq!(get_logged_in_user(&stale_jar, &db_connection), Ok(None));
    }
}
