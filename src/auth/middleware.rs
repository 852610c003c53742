//! Authentication middleware that checks the session cookie, extends sessions, and handles redirects.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        Session,
        cookie::{blank_session_cookie, get_session_id, set_session_cookie},
        session::{extend_session_if_needed, get_valid_session},
    },
    endpoints,
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a session lasts after it was last extended.
    pub session_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Get the unexpired session referred to by the session cookie in `jar`.
///
/// # Errors
///
/// Returns a:
/// - [Error::Unauthorized] if there is no session cookie, or the session it
///   refers to does not exist or has expired,
/// - [Error::SqlError] if the session could not be read from the database.
pub fn require_session(jar: &PrivateCookieJar, connection: &Connection) -> Result<Session, Error> {
    let session_id = get_session_id(jar).ok_or(Error::Unauthorized)?;

    get_valid_session(&session_id, connection)
}

/// Check the session and run the request with the user ID in its extensions.
///
/// `get_redirect` builds the response for a request without a valid session
/// and `render_error` the response for any other failure.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn() -> Response,
    render_error: impl Fn(Error) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return get_redirect();
        }
    };

    let (session, was_extended) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return render_error(Error::DatabaseLockError);
            }
        };

        let session = match require_session(&jar, &connection) {
            Ok(session) => session,
            Err(Error::Unauthorized) => {
                return (blank_session_cookie(jar), get_redirect()).into_response();
            }
            Err(error) => {
                tracing::error!("could not check session: {error}");
                return render_error(error);
            }
        };

        let previous_expiry = session.expires_at;
        match extend_session_if_needed(session, state.session_duration, &connection) {
            Ok(session) => {
                let was_extended = session.expires_at != previous_expiry;
                (session, was_extended)
            }
            Err(Error::Unauthorized) => {
                return (blank_session_cookie(jar), get_redirect()).into_response();
            }
            Err(error) => {
                tracing::error!("could not extend session: {error}");
                return render_error(error);
            }
        }
    };

    parts.extensions.insert(session.user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    if !was_extended {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let jar = set_session_cookie(jar, &session);
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid session cookie.
/// The user ID is placed into request and then the request executed normally if the session is valid, otherwise a redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(
        state,
        request,
        next,
        || Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
        |error| error.into_response(),
    )
    .await
}

/// Middleware function that checks for a valid session cookie.
/// The user ID is placed into request and then the request executed normally if the session is valid, otherwise a 401 response with a HTMX redirect to the log-in page is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(
        state,
        request,
        next,
        || {
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::UNAUTHORIZED,
            )
                .into_response()
        },
        |error| error.into_alert_response(),
    )
    .await
}
