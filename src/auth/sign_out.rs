//! Sign-out route handler that ends the session and clears the session cookie.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{
        cookie::{blank_session_cookie, get_session_id},
        session::invalidate_session,
    },
    endpoints,
};

/// The state needed for signing out.
#[derive(Debug, Clone)]
pub struct SignOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SignOutState> for Key {
    fn from_ref(state: &SignOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Delete the session, blank the session cookie and send the client to the log-in page.
///
/// Signing out without a session, or with one that has already ended, still succeeds.
/// If the session could not be deleted, an error alert is returned and the cookie is left alone.
pub async fn post_sign_out(State(state): State<SignOutState>, jar: PrivateCookieJar) -> Response {
    if let Some(session_id) = get_session_id(&jar) {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        if let Err(error) = invalidate_session(&session_id, &connection) {
            tracing::error!("could not delete session: {error}");
            return error.into_alert_response();
        }
    }

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
        blank_session_cookie(jar),
    )
        .into_response()
}
