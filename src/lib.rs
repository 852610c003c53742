//! Ledger is a web app for recording dated income and expenses, tagging them,
//! and keeping an eye on the running total for the month.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod amount;
mod app_state;
mod auth;
mod calendar;
mod database_id;
mod db;
mod endpoints;
mod entry;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod tag;
mod timezone;
mod validation;

#[cfg(test)]
mod test_utils;

pub use amount::{Cents, MAX_CENTS, MAX_DOLLARS, is_non_zero, to_cents};
pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, Username, ValidatedPassword, create_user};
pub use calendar::{month_window, to_utc_midnight, validate_calendar_date};
pub use db::initialize as initialize_db;
pub use entry::{
    Entry, EntryId, EntryUpdate, EntryWithTag, NewEntry, TagChange, create_entry, delete_entry,
    list_entries, month_total, update_entry,
};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use tag::{Tag, TagColor, TagId, TagName, create_tag, list_tags, update_tag};
pub use timezone::{get_local_offset, local_today};
pub use validation::ValidationErrors;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
