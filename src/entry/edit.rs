//! The page and endpoint for editing an entry.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
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
        EntryId, get_entry,
        form::{EntryForm, entry_form_fields},
        update_entry,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    tag::{Tag, list_tags},
    validation::ValidationErrors,
};

/// The state needed for the edit entry page and the update endpoint.
#[derive(Debug, Clone)]
pub struct EditEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for editing one of the user's entries.
pub async fn get_edit_entry_page(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let entry = get_entry(user_id, entry_id, &connection)?;
    let tags = list_tags(user_id, &connection)?;

    Ok(edit_entry_view(
        entry_id,
        &EntryForm::from_entry(&entry),
        &ValidationErrors::new(),
        &tags,
    )
    .into_response())
}

/// A route handler for updating an entry, redirects to the ledger page on success.
pub async fn update_entry_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<EditEntryState>,
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

    let update = match form.validate_update() {
        Ok(update) => update,
        Err(errors) => {
            tracing::debug!("rejected update to entry {entry_id}: {errors}");

            return match list_tags(user_id, &connection) {
                Ok(tags) => (
                    StatusCode::BAD_REQUEST,
                    edit_entry_form_view(entry_id, &form, &errors, &tags),
                )
                    .into_response(),
                Err(error) => error.into_alert_response(),
            };
        }
    };

    match update_entry(user_id, entry_id, update, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::LEDGER_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::UpdateMissingEntry | Error::TagNotFound(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_entry_view(
    entry_id: EntryId,
    values: &EntryForm,
    errors: &ValidationErrors,
    tags: &[Tag],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_ENTRY_VIEW).into_html();
    let form = edit_entry_form_view(entry_id, values, errors, tags);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full flex justify-between items-center mb-4"
            {
                h1 class="text-xl font-bold" { "Edit Entry" }
                a href=(endpoints::LEDGER_VIEW) class=(LINK_STYLE) { "Cancel" }
            }

            (form)
        }
    };

    base("Edit Entry", &[dollar_input_styles()], &content)
}

fn edit_entry_form_view(
    entry_id: EntryId,
    values: &EntryForm,
    errors: &ValidationErrors,
    tags: &[Tag],
) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::ENTRY, entry_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-target-400="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            (entry_form_fields(values, errors, tags))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }
        }
    }
}

#[cfg(test)]
mod edit_entry_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;

    use crate::{
        Error, endpoints,
        entry::{Entry, form::EntryForm, get_entry},
        tag::{Tag, TagColor, TagName, create_tag},
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, create_test_user, get_test_connection, must_get_form,
            parse_html_document, parse_html_fragment,
        },
    };

    use super::{EditEntryState, get_edit_entry_page, update_entry_endpoint};

    struct Fixture {
        state: EditEntryState,
        user_id: crate::auth::UserID,
        entry: Entry,
        tag: Tag,
    }

    fn fixture() -> Fixture {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "alice");
        let tag = create_tag(
            user_id,
            TagName::new_unchecked("Food"),
            TagColor::new_unchecked("#ff8800"),
            &connection,
        )
        .unwrap();
        let entry = crate::test_utils::create_test_entry(&connection, user_id, Some(tag.id));

        Fixture {
            state: EditEntryState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user_id,
            entry,
            tag,
        }
    }

    fn form_from(entry: &Entry) -> EntryForm {
        EntryForm::from_entry(entry)
    }

    #[tokio::test]
    async fn page_is_prefilled() {
        let Fixture {
            state,
            user_id,
            entry,
            tag,
        } = fixture();

        let response = get_edit_entry_page(Path(entry.id), State(state), Extension(user_id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::ENTRY, entry.id),
            "hx-put",
        );
        let (dollars, cents) = crate::amount::split_cents(entry.amount_cents);
        assert_form_input_with_value(&form, "dollars", "number", &dollars.to_string());
        assert_form_input_with_value(&form, "cents", "number", &cents.to_string());

        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .expect("No selected tag");
        assert_eq!(selected.value().attr("value"), Some(tag.id.to_string().as_str()));
    }

    #[tokio::test]
    async fn page_for_other_users_entry_is_not_found() {
        let Fixture { state, entry, .. } = fixture();
        let bob = create_test_user(&state.db_connection.lock().unwrap(), "bob");

        let result = get_edit_entry_page(Path(entry.id), State(state), Extension(bob)).await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn update_with_empty_tag_clears_tag() {
        let Fixture {
            state,
            user_id,
            entry,
            ..
        } = fixture();
        let form = EntryForm {
            description: Some("Groceries".to_owned()),
            tag_id: Some("".to_owned()),
            ..form_from(&entry)
        };

        let response =
            update_entry_endpoint(Path(entry.id), State(state.clone()), Extension(user_id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::LEDGER_VIEW);
        let updated = get_entry(user_id, entry.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.description, "Groceries");
        assert_eq!(updated.tag_id, None);
        assert_eq!(updated.amount_cents, entry.amount_cents);
    }

    #[tokio::test]
    async fn update_without_tag_field_keeps_tag() {
        let Fixture {
            state,
            user_id,
            entry,
            tag,
        } = fixture();
        let form = EntryForm {
            dollars: Some("42".to_owned()),
            tag_id: None,
            ..form_from(&entry)
        };

        let response =
            update_entry_endpoint(Path(entry.id), State(state.clone()), Extension(user_id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let updated = get_entry(user_id, entry.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.tag_id, Some(tag.id));
        assert_eq!(updated.amount_cents / 100, 42);
    }

    #[tokio::test]
    async fn invalid_date_re_renders_form() {
        let Fixture {
            state,
            user_id,
            entry,
            ..
        } = fixture();
        let form = EntryForm {
            year: Some("2023".to_owned()),
            month: Some("2".to_owned()),
            day: Some("29".to_owned()),
            ..form_from(&entry)
        };

        let response =
            update_entry_endpoint(Path(entry.id), State(state.clone()), Extension(user_id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        let form_errors: String = form
            .select(&Selector::parse("#form-errors").unwrap())
            .next()
            .expect("No form errors found")
            .text()
            .collect();
        assert_eq!(form_errors.trim(), "Invalid date");
        assert_eq!(
            get_entry(user_id, entry.id, &state.db_connection.lock().unwrap()),
            Ok(entry)
        );
    }

    #[tokio::test]
    async fn update_missing_entry_is_not_found() {
        let Fixture {
            state,
            user_id,
            entry,
            ..
        } = fixture();

        let response = update_entry_endpoint(
            Path(entry.id + 100),
            State(state),
            Extension(user_id),
            Form(form_from(&entry)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
