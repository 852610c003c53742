#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, UserID, Username, create_user},
    db::initialize,
    entry::{Entry, NewEntry, create_entry},
    tag::TagId,
};

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_input_with_value,
    assert_form_submit_button, assert_form_submit_button_with_text, assert_hx_endpoint,
    must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_content_type, assert_hx_redirect};

/// An in-memory database with all of the app's tables.
#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Insert a user called `username` with a placeholder password hash.
#[track_caller]
pub(crate) fn create_test_user(connection: &Connection, username: &str) -> UserID {
    create_user(
        Username::new_unchecked(username),
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
    .id
}

/// Insert a $12.34 entry dated 2024-06-15 for `user_id`.
#[track_caller]
pub(crate) fn create_test_entry(
    connection: &Connection,
    user_id: UserID,
    tag_id: Option<TagId>,
) -> Entry {
    create_entry(
        user_id,
        NewEntry {
            description: "Test entry".to_owned(),
            dollars: 12,
            cents: 34,
            year: 2024,
            month: 6,
            day: 15,
            tag_id,
        },
        connection,
    )
    .expect("Could not create test entry")
}
