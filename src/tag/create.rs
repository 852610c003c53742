//! Tag creation page and endpoint.

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
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::{
        create_tag,
        form::{TagForm, TagFormAction, tag_form_view},
    },
    validation::ValidationErrors,
};

/// The state needed for creating a tag.
#[derive(Debug, Clone)]
pub struct CreateTagEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTagEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the tag creation page.
pub async fn get_new_tag_page() -> Response {
    new_tag_view().into_response()
}

/// Handle tag creation form submission.
pub async fn create_tag_endpoint(
    State(state): State<CreateTagEndpointState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TagForm>,
) -> Response {
    let (name, color) = match form.validate() {
        Ok(tag) => tag,
        Err(errors) => {
            return (StatusCode::BAD_REQUEST, new_tag_form_view(&form, &errors)).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_tag(user_id, name, color, &connection) {
        Ok(tag) => {
            tracing::debug!("created tag {} for user {user_id}", tag.id);

            (
                HxRedirect(endpoints::TAGS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a tag: {error}");

            error.into_alert_response()
        }
    }
}

fn new_tag_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TAG_VIEW).into_html();
    let form = new_tag_form_view(&TagForm::default(), &ValidationErrors::new());

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Tag" }
            (form)
        }
    };

    base("Create Tag", &[], &content)
}

fn new_tag_form_view(values: &TagForm, errors: &ValidationErrors) -> Markup {
    tag_form_view(
        TagFormAction::Create {
            endpoint: endpoints::TAGS_API,
        },
        values,
        errors,
    )
}
