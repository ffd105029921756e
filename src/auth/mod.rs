//! User accounts and cookie sessions.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod sign_up;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub(crate) use cookie::{get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::api_auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use sign_up::{post_sign_up, sign_up_page};
pub(super) use token::Token;
pub(crate) use user::get_logged_in_user;
pub use user::{User, UserID, create_user, create_user_table, get_user_by_id, get_user_by_username};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
