//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError, tag::TagId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request did not carry a valid, unexpired session.
    #[error("no valid session")]
    Unauthorized,

    /// The password is shorter than [crate::ValidatedPassword::MIN_LENGTH].
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    /// The password is longer than [crate::ValidatedPassword::MAX_LENGTH].
    #[error("Password must be 128 characters or less")]
    PasswordTooLong,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username is too short, too long or uses characters other than
    /// ASCII letters, digits and underscores.
    #[error("Username must be 3 to 16 letters, digits or underscores")]
    InvalidUsername,

    /// The username is already registered to another user.
    #[error("Username already taken")]
    DuplicateUsername,

    /// The dollar or cent component of an amount is outside of the allowed range.
    #[error("the amount ${dollars}.{cents:02} is out of range")]
    AmountOutOfRange {
        /// The whole dollar component.
        dollars: u32,
        /// The cent component.
        cents: u32,
    },

    /// The year, month and day do not form a real calendar date.
    #[error("{year}-{month}-{day} is not a valid date")]
    InvalidCalendarDate {
        /// The calendar year.
        year: i32,
        /// The month of the year, starting from 1.
        month: u8,
        /// The day of the month, starting from 1.
        day: u8,
    },

    /// The tag ID used for an entry did not match a tag owned by the user.
    #[error("the tag ID {0} does not refer to a valid tag")]
    TagNotFound(TagId),

    /// An empty string was used to create a tag name.
    #[error("Tag name cannot be empty")]
    EmptyTagName,

    /// An empty string was used to create a tag color.
    #[error("Tag color cannot be empty")]
    EmptyTagColor,

    /// The tag color is neither a hex code nor a color name.
    #[error("Tag color must be a hex code like #3b82f6 or a color name")]
    InvalidTagColor,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update an entry that does not exist or belongs to another user
    #[error("tried to update an entry that is not in the database")]
    UpdateMissingEntry,

    /// Tried to delete an entry that does not exist or belongs to another user
    #[error("tried to delete an entry that is not in the database")]
    DeleteMissingEntry,

    /// Tried to update a tag that does not exist or belongs to another user
    #[error("tried to update a tag that is not in the database")]
    UpdateMissingTag,

    /// Tried to delete a tag that does not exist or belongs to another user
    #[error("tried to delete a tag that is not in the database")]
    DeleteMissingTag,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Not signed in".to_owned(),
                    details: "Your session has expired. Log in again to continue.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::TagNotFound(tag_id) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Invalid tag".to_owned(),
                    details: format!("Could not find a tag with the ID {tag_id}"),
                },
            ),
            Error::UpdateMissingEntry => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update entry".to_owned(),
                    details: "The entry could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingEntry => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete entry".to_owned(),
                    details: "The entry could not be found. \
                    Try refreshing the page to see if the entry has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingTag => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update tag".to_owned(),
                    details: "The tag could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTag => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete tag".to_owned(),
                    details: "The tag could not be found. \
                    Try refreshing the page to see if the tag has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested item could not be found.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
