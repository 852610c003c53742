//! Server-side sessions that the session cookie refers to.

use rusqlite::{Connection, Row, types::Type};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, auth::UserID};

/// A signed in user's session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// A random, unguessable identifier that is stored in the session cookie.
    pub id: String,
    /// The user the session belongs to.
    pub user_id: UserID,
    /// The session is not valid at or after this time.
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Whether the session has expired as of `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Create the session table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_session_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS session (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Start a new session for `user_id` that lasts for `duration`.
///
/// # Errors
///
/// Returns an [Error::SqlError] if the session could not be stored.
pub fn create_session(
    user_id: UserID,
    duration: Duration,
    connection: &Connection,
) -> Result<Session, Error> {
    let id = Uuid::new_v4().to_string();
    let expires_at = OffsetDateTime::now_utc() + duration;

    connection
        .prepare(
            "INSERT INTO session (id, user_id, expires_at) VALUES (?1, ?2, ?3)
            RETURNING id, user_id, expires_at",
        )?
        .query_row(
            (id, user_id.as_i64(), expires_at.unix_timestamp()),
            map_row,
        )
        .map_err(Error::from)
}

/// Get the session with `session_id` if it exists and has not expired.
///
/// An expired session is deleted.
///
/// # Errors
///
/// Returns a:
/// - [Error::Unauthorized] if there is no session with `session_id` or it has expired,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn get_valid_session(session_id: &str, connection: &Connection) -> Result<Session, Error> {
    let session = connection
        .prepare("SELECT id, user_id, expires_at FROM session WHERE id = :id")?
        .query_row(&[(":id", session_id)], map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::Unauthorized,
            error => error,
        })?;

    if session.is_expired_at(OffsetDateTime::now_utc()) {
        tracing::debug!("session for user {} has expired", session.user_id);
        invalidate_session(&session.id, connection)?;
        return Err(Error::Unauthorized);
    }

    Ok(session)
}

/// Push the expiry of `session` back to `duration` from now if less than half
/// of `duration` remains.
///
/// Returns the session as it is stored after the update.
///
/// # Errors
///
/// Returns a:
/// - [Error::Unauthorized] if the session was removed in the meantime,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn extend_session_if_needed(
    session: Session,
    duration: Duration,
    connection: &Connection,
) -> Result<Session, Error> {
    let now = OffsetDateTime::now_utc();

    if session.expires_at - now >= duration / 2 {
        return Ok(session);
    }

    let expires_at = now + duration;

    connection
        .prepare(
            "UPDATE session SET expires_at = ?1 WHERE id = ?2
            RETURNING id, user_id, expires_at",
        )?
        .query_row((expires_at.unix_timestamp(), &session.id), map_row)
        .map_err(|error| match Error::from(error) {
            Error::NotFound => Error::Unauthorized,
            error => error,
        })
}

/// Delete the session with `session_id`.
///
/// Deleting a session that does not exist is not an error.
///
/// # Errors
///
/// Returns an [Error::SqlError] if an SQL related error occurred.
pub fn invalidate_session(session_id: &str, connection: &Connection) -> Result<(), Error> {
    connection.execute("DELETE FROM session WHERE id = ?1", (session_id,))?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Session, rusqlite::Error> {
    let timestamp: i64 = row.get(2)?;
    let expires_at = OffsetDateTime::from_unix_timestamp(timestamp).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(error))
    })?;

    Ok(Session {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        expires_at,
    })
}
