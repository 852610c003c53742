//! Tags listing page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, tag_badge,
    },
    navigation::NavBar,
    tag::{Tag, db::count_entries_per_tag},
};

/// The state needed for the tags listing page.
#[derive(Debug, Clone)]
pub struct TagsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TagsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user's tags with how many entries use each one.
pub async fn get_tags_page(
    State(state): State<TagsPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let tags = count_entries_per_tag(user_id, &connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve tags: {error}"))?;

    Ok(tags_view(&tags).into_response())
}

fn tags_view(tags: &[(Tag, u64)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TAGS_VIEW).into_html();

    let table_row = |(tag, entry_count): &(Tag, u64)| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_TAG_VIEW, tag.id);
        let delete_url = endpoints::format_endpoint(endpoints::TAG, tag.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? It will be removed from {} entries.",
            tag.name, entry_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (tag_badge(tag.name.as_ref(), tag.color.as_ref())) }
                td class=(TABLE_CELL_STYLE) { (entry_count) }
                td class=(TABLE_CELL_STYLE)
                {
                    (edit_delete_action_links(&edit_url, &delete_url, &confirm_message, "closest tr"))
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-4"
            {
                div class="flex justify-between items-center"
                {
                    h1 class="text-xl font-bold" { "Tags" }
                    a href=(endpoints::NEW_TAG_VIEW) class=(LINK_STYLE) { "Create Tag" }
                }

                @if tags.is_empty() {
                    p
                    {
                        "No tags yet. Tags let you group entries, e.g. 'Groceries' or 'Salary'. "
                        a href=(endpoints::NEW_TAG_VIEW) class=(LINK_STYLE) { "Create one" }
                        "."
                    }
                } @else {
                    div class="relative overflow-x-auto shadow-md rounded"
                    {
                        table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Tag" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Entries" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }

                            tbody
                            {
                                @for tag in tags {
                                    (table_row(tag))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Tags", &[], &content)
}
