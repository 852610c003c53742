//! Defines functions for storing the session ID in an encrypted cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::auth::Session;

/// The name of the cookie that holds the session ID.
pub(crate) const COOKIE_SESSION: &str = "session";

/// Add the session cookie for `session` to the cookie jar.
///
/// The cookie expires at the same time as the session.
pub(crate) fn set_session_cookie(jar: PrivateCookieJar, session: &Session) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, session.id.clone()))
            .path("/")
            .expires(session.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn blank_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session ID from the session cookie, if there is one.
pub(crate) fn get_session_id(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(COOKIE_SESSION)
        .map(|cookie| cookie.value_trimmed().to_owned())
}
