//! Tag editing page and endpoint.

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
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
    tag::{
        TagId, get_tag,
        form::{TagForm, TagFormAction, tag_form_view},
        update_tag,
    },
    validation::ValidationErrors,
};

/// The state needed for the edit tag page and the update endpoint.
#[derive(Debug, Clone)]
pub struct EditTagState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTagState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the tag editing page.
///
/// Responds with the 404 page if the tag does not exist or belongs to
/// another user.
pub async fn get_edit_tag_page(
    Path(tag_id): Path<TagId>,
    State(state): State<EditTagState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tag = get_tag(user_id, tag_id, &connection)?;

    Ok(edit_tag_view(tag_id, &TagForm::from_tag(&tag)).into_response())
}

/// Handle tag update form submission.
pub async fn update_tag_endpoint(
    Path(tag_id): Path<TagId>,
    State(state): State<EditTagState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TagForm>,
) -> Response {
    let (name, color) = match form.validate() {
        Ok(tag) => tag,
        Err(errors) => {
            return (
                StatusCode::BAD_REQUEST,
                edit_tag_form_view(tag_id, &form, &errors),
            )
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_tag(user_id, tag_id, name, color, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TAGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingTag) => Error::UpdateMissingTag.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating tag {tag_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_tag_view(tag_id: TagId, values: &TagForm) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_TAG_VIEW).into_html();
    let form = edit_tag_form_view(tag_id, values, &ValidationErrors::new());

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Tag" }
            (form)
        }
    };

    base("Edit Tag", &[], &content)
}

fn edit_tag_form_view(tag_id: TagId, values: &TagForm, errors: &ValidationErrors) -> Markup {
    let update_endpoint = endpoints::format_endpoint(endpoints::TAG, tag_id);

    tag_form_view(
        TagFormAction::Update {
            endpoint: &update_endpoint,
        },
        values,
        errors,
    )
}
