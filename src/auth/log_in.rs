//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The rest of the auth module handles the lower level session and cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{cookie::set_session_cookie, session::create_session, user::get_user_by_username},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, base, log_in_register, password_input, username_input},
};

/// The message shown when the username or password is wrong.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password";

const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

fn log_in_form(username: &str, error_message: Option<&str>) -> Markup {
    let error_messages: Vec<String> = error_message.map(str::to_owned).into_iter().collect();

    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, &[]))

            (password_input(0, &error_messages))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Register here"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Response {
    let log_in_form = log_in_form("", None);
    let content = log_in_register("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a new session lasts.
    pub session_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
///
/// Neither field is validated beyond being compared against the registered user.
#[derive(Clone, Default, Deserialize)]
pub struct LogInData {
    /// The username entered during log-in.
    pub username: Option<String>,
    /// Password entered during log-in.
    pub password: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, a session is started, the session cookie
/// is set and the client is redirected to the ledger page.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let username = user_data.username.as_deref().unwrap_or_default().trim();
    let password = user_data.password.as_deref().unwrap_or_default();

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match get_user_by_username(username, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::warn!("log in attempt for unknown username {username:?}");
            return log_in_form(username, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(username, Some(INTERNAL_ERROR_MSG)).into_response();
        }
    };

    match user.password_hash.verify(password) {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("wrong password for user {}", user.id);
            return log_in_form(username, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(username, Some(INTERNAL_ERROR_MSG)).into_response();
        }
    }

    match create_session(user.id, state.session_duration, &connection) {
        Ok(session) => {
            tracing::info!("user {} logged in", user.id);

            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::LEDGER_VIEW.to_owned()),
                set_session_cookie(jar, &session),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Error starting session: {error}");
            (
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::http::StatusCode;
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button_with_text(&form, "Log in");

        let links: Vec<_> = form
            .select(&Selector::parse("a[href]").unwrap())
            .map(|link| link.value().attr("href").unwrap_or_default().to_owned())
            .collect();
        assert_eq!(links, [endpoints::REGISTER_VIEW]);
    }
}
