//! The endpoint for adding an entry to the ledger.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    entry::{
        create_entry,
        form::{EntryForm, entry_form_fields},
    },
    html::BUTTON_PRIMARY_STYLE,
    tag::{Tag, list_tags},
    validation::ValidationErrors,
};

/// The state needed for creating an entry.
#[derive(Debug, Clone)]
pub struct CreateEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new entry, redirects to the ledger page on success.
///
/// Invalid input re-renders the form with the errors and a 400 status.
pub async fn create_entry_endpoint(
    State(state): State<CreateEntryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<EntryForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let new_entry = match form.validate_new() {
        Ok(new_entry) => new_entry,
        Err(errors) => {
            tracing::debug!("rejected new entry: {errors}");

            return match list_tags(user_id, &connection) {
                Ok(tags) => (
                    StatusCode::BAD_REQUEST,
                    new_entry_form_view(&form, &errors, &tags),
                )
                    .into_response(),
                Err(error) => error.into_alert_response(),
            };
        }
    };

    match create_entry(user_id, new_entry, &connection) {
        Ok(entry) => {
            tracing::debug!("created entry {} for user {user_id}", entry.id);

            (
                HxRedirect(endpoints::LEDGER_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ Error::TagNotFound(_)) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("could not create entry: {error}");
            error.into_alert_response()
        }
    }
}

/// The form for adding an entry, shown on the ledger page.
pub fn new_entry_form_view(values: &EntryForm, errors: &ValidationErrors, tags: &[Tag]) -> Markup {
    html! {
        form
            hx-post=(endpoints::ENTRIES_API)
            hx-target-400="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (entry_form_fields(values, errors, tags))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Entry" }
        }
    }
}

#[cfg(test)]
mod create_entry_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Form, extract::State, http::StatusCode};
    use scraper::Selector;
    use time::macros::datetime;

    use crate::{
        endpoints,
        entry::{form::EntryForm, list_entries},
        tag::{TagColor, TagName, create_tag},
        test_utils::{
            assert_hx_endpoint, assert_hx_redirect, assert_valid_html, create_test_user,
            get_test_connection, must_get_form, parse_html_fragment,
        },
    };

    use super::{CreateEntryState, create_entry_endpoint};

    fn coffee_form() -> EntryForm {
        EntryForm {
            description: Some("Coffee".to_owned()),
            dollars: Some("3".to_owned()),
            cents: Some("50".to_owned()),
            year: Some("2024".to_owned()),
            month: Some("6".to_owned()),
            day: Some("15".to_owned()),
            tag_id: Some("".to_owned()),
        }
    }

    fn get_state() -> (CreateEntryState, crate::auth::UserID) {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "alice");

        (
            CreateEntryState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user_id,
        )
    }

    #[tokio::test]
    async fn creates_entry_and_redirects() {
        let (state, user_id) = get_state();

        let response =
            create_entry_endpoint(State(state.clone()), Extension(user_id), Form(coffee_form()))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::LEDGER_VIEW);

        let entries = list_entries(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry.description, "Coffee");
        assert_eq!(entries[0].entry.amount_cents, 350);
        assert_eq!(entries[0].entry.date, datetime!(2024-06-15 0:00 UTC));
        assert_eq!(entries[0].tag, None);
    }

    #[tokio::test]
    async fn creates_tagged_entry() {
        let (state, user_id) = get_state();
        let tag = create_tag(
            user_id,
            TagName::new_unchecked("Coffee"),
            TagColor::new_unchecked("brown"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let form = EntryForm {
            tag_id: Some(tag.id.to_string()),
            ..coffee_form()
        };

        let response =
            create_entry_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let entries = list_entries(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(entries[0].tag, Some(tag));
    }

    #[tokio::test]
    async fn zero_amount_re_renders_form() {
        let (state, user_id) = get_state();
        let form = EntryForm {
            dollars: Some("0".to_owned()),
            cents: Some("0".to_owned()),
            ..coffee_form()
        };

        let response =
            create_entry_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::ENTRIES_API, "hx-post");
        let form_errors: String = form
            .select(&Selector::parse("#form-errors").unwrap())
            .next()
            .expect("No form errors found")
            .text()
            .collect();
        assert_eq!(form_errors.trim(), "Amount must be greater than 0");

        assert!(
            list_entries(user_id, &state.db_connection.lock().unwrap())
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn unknown_tag_is_not_found() {
        let (state, user_id) = get_state();
        let form = EntryForm {
            tag_id: Some("99".to_owned()),
            ..coffee_form()
        };

        let response = create_entry_endpoint(State(state), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
