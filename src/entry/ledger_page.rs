//! The ledger page: this month's total, the form for adding entries and the
//! full entry history.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    entry::{EntryWithTag, create::new_entry_form_view, form::EntryForm, list_entries, month_total},
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        dollar_input_styles, edit_delete_action_links, format_currency, tag_badge,
    },
    navigation::NavBar,
    tag::{Tag, list_tags},
    timezone::local_today,
    validation::ValidationErrors,
};

/// The state needed for the ledger page.
#[derive(Debug, Clone)]
pub struct LedgerPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The canonical timezone name used to work out today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the ledger page for the signed in user.
pub async fn get_ledger_page(
    State(state): State<LedgerPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let total = month_total(user_id, today, &connection)
        .inspect_err(|error| tracing::error!("could not get month total: {error}"))?;
    let entries = list_entries(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list entries: {error}"))?;
    let tags = list_tags(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not list tags: {error}"))?;

    Ok(ledger_view(today, total, &entries, &tags).into_response())
}

fn ledger_view(today: Date, total: i64, entries: &[EntryWithTag], tags: &[Tag]) -> Markup {
    let nav_bar = NavBar::new(endpoints::LEDGER_VIEW).into_html();
    let form = new_entry_form_view(&EntryForm::seed(today), &ValidationErrors::new(), tags);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-8"
            {
                section class="p-6 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    h2 class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Total for " (today.month()) " " (today.year())
                    }

                    p id="month-total" class="text-3xl font-bold" { (format_currency(total)) }
                }

                section class="p-6 bg-white rounded-lg shadow dark:bg-gray-800"
                {
                    h2 class="text-xl font-bold mb-4" { "New Entry" }
                    (form)
                }

                section
                {
                    h2 class="text-xl font-bold mb-4" { "History" }
                    (history_view(entries))
                }
            }
        }
    };

    base("Ledger", &[dollar_input_styles()], &content)
}

fn history_view(entries: &[EntryWithTag]) -> Markup {
    if entries.is_empty() {
        return html! {
            p { "No entries yet. Add your first one above." }
        };
    }

    html! {
        div class="relative overflow-x-auto shadow-md rounded"
        {
            table id="history" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Tag" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for EntryWithTag { entry, tag } in entries {
                        @let edit_url = endpoints::format_endpoint(endpoints::EDIT_ENTRY_VIEW, entry.id);
                        @let delete_url = endpoints::format_endpoint(endpoints::ENTRY, entry.id);

                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { time datetime=(entry.date.date()) { (entry.date.date()) } }
                            td class=(TABLE_CELL_STYLE) { (entry.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if let Some(tag) = tag {
                                    (tag_badge(tag.name.as_ref(), tag.color.as_ref()))
                                }
                            }
                            td class="px-6 py-4 text-right" { (format_currency(entry.amount_cents)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (edit_delete_action_links(
                                    &edit_url,
                                    &delete_url,
                                    "Are you sure you want to delete this entry?",
                                    "closest tr",
                                ))
                            }
                        }
                    }
                }
            }
        }
    }
}
