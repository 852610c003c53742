//! The registration page and the endpoint for creating a new account.
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
    auth::{
        PasswordHash, Username, ValidatedPassword, cookie::set_session_cookie, create_user,
        session::create_session,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        field_errors, log_in_register, password_input, username_input,
    },
    validation::{ValidationErrors, required_text},
};

/// The message shown when the password and its confirmation differ.
pub const PASSWORDS_DO_NOT_MATCH_MSG: &str = "Passwords do not match";

fn confirm_password_input(error_messages: &[String]) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(ValidatedPassword::MIN_LENGTH);

            (field_errors(error_messages))
        }
    }
}

fn registration_form(username: &str, errors: &ValidationErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target-400="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4 md:space-y-6"
        {
            (username_input(username, errors.messages("username")))
            (password_input(ValidatedPassword::MIN_LENGTH, errors.messages("password")))
            (confirm_password_input(errors.messages("confirm_password")))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", &ValidationErrors::new());
    let content = log_in_register("Create Account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a new session lasts.
    pub session_duration: Duration,
    /// The bcrypt cost used to hash new passwords.
    pub password_hash_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            session_duration: state.session_duration,
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl RegisterForm {
    /// Check the username and password, and that the password was typed the same way twice.
    pub fn validate(&self) -> Result<(Username, ValidatedPassword), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = required_text(self.username.as_deref(), "username", &mut errors).and_then(
            |raw| match Username::new(raw) {
                Ok(username) => Some(username),
                Err(error) => {
                    errors.add("username", error.to_string());
                    None
                }
            },
        );

        let password = required_text(self.password.as_deref(), "password", &mut errors).and_then(
            |raw| match ValidatedPassword::new(raw) {
                Ok(password) => Some(password),
                Err(error) => {
                    errors.add("password", error.to_string());
                    None
                }
            },
        );

        if password.is_some() && self.password != self.confirm_password {
            errors.add("confirm_password", PASSWORDS_DO_NOT_MATCH_MSG);
        }

        match (username, password) {
            (Some(username), Some(password)) => errors.into_result((username, password)),
            _ => Err(errors),
        }
    }
}

/// Handler for registration requests.
///
/// On success the new user is signed in and redirected to the ledger page.
/// Invalid input, including a username that is already taken, re-renders the
/// form with the errors and a 400 status.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let raw_username = user_data.username.as_deref().unwrap_or_default();

    let (username, password) = match user_data.validate() {
        Ok(validated) => validated,
        Err(errors) => {
            tracing::debug!("rejected registration: {errors}");
            return (StatusCode::BAD_REQUEST, registration_form(raw_username, &errors))
                .into_response();
        }
    };

    let password_hash = match PasswordHash::new(password, state.password_hash_cost) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let user = match create_user(username, password_hash, &connection) {
        Ok(user) => user,
        Err(Error::DuplicateUsername) => {
            let mut errors = ValidationErrors::new();
            errors.add("username", Error::DuplicateUsername.to_string());
            return (StatusCode::BAD_REQUEST, registration_form(raw_username, &errors))
                .into_response();
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("registered user {} ({})", user.id, user.username);

    match create_session(user.id, state.session_duration, &connection) {
        Ok(session) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::LEDGER_VIEW.to_owned()),
            set_session_cookie(jar, &session),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error starting session for new user: {error}");
            error.into_alert_response()
        }
    }
}
