//! The endpoint for deleting an entry.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::UserID,
    endpoints,
    entry::{EntryId, delete_entry},
};

/// The state needed for deleting an entry.
#[derive(Debug, Clone)]
pub struct DeleteEntryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an entry.
///
/// Redirects to the ledger page so the month total is refreshed.
pub async fn delete_entry_endpoint(
    Path(entry_id): Path<EntryId>,
    State(state): State<DeleteEntryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_entry(user_id, entry_id, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::LEDGER_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::DeleteMissingEntry) => Error::DeleteMissingEntry.into_alert_response(),
        Err(error) => {
            tracing::error!("could not delete entry {entry_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_entry_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Error, endpoints,
        entry::get_entry,
        test_utils::{
            assert_hx_redirect, assert_valid_html, create_test_entry, create_test_user,
            get_test_connection, parse_html_fragment,
        },
    };

    use super::{DeleteEntryState, delete_entry_endpoint};

    #[tokio::test]
    async fn deletes_entry_once() {
        let connection = get_test_connection();
        let user_id = create_test_user(&connection, "alice");
        let entry = create_test_entry(&connection, user_id, None);
        let state = DeleteEntryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_entry_endpoint(Path(entry.id), State(state.clone()), Extension(user_id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::LEDGER_VIEW);
        assert_eq!(
            get_entry(user_id, entry.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );

        let second_response =
            delete_entry_endpoint(Path(entry.id), State(state), Extension(user_id)).await;

        assert_eq!(second_response.status(), StatusCode::NOT_FOUND);
        let html = parse_html_fragment(second_response).await;
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn cannot_delete_other_users_entry() {
        let connection = get_test_connection();
        let alice = create_test_user(&connection, "alice");
        let bob = create_test_user(&connection, "bob");
        let entry = create_test_entry(&connection, alice, None);
        let state = DeleteEntryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_entry_endpoint(Path(entry.id), State(state.clone()), Extension(bob)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(get_entry(alice, entry.id, &state.db_connection.lock().unwrap()).is_ok());
    }
}
