//! Accounts, sessions and the session gate that guards every other route.

mod cookie;
mod log_in;
mod middleware;
mod password;
mod register;
mod session;
mod sign_out;
mod user;

pub use log_in::{get_log_in_page, post_log_in};
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{get_register_page, register_user};
pub use session::{Session, create_session_table};
pub use sign_out::post_sign_out;
pub use user::{User, UserID, Username, create_user, create_user_table};
