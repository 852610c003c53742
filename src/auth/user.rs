//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A name that a user logs in with.
///
/// Between [Username::MIN_LENGTH] and [Username::MAX_LENGTH] ASCII letters,
/// digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// The fewest characters a username may have.
    pub const MIN_LENGTH: usize = 3;
    /// The most characters a username may have.
    pub const MAX_LENGTH: usize = 16;

    /// Create a username from `raw_username`, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] if the username is too short, too long
    /// or contains characters other than ASCII letters, digits and underscores.
    pub fn new(raw_username: &str) -> Result<Self, Error> {
        let username = raw_username.trim();

        let is_valid_length = (Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&username.len());
        let is_valid_charset = username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if is_valid_length && is_valid_charset {
            Ok(Self(username.to_owned()))
        } else {
            Err(Error::InvalidUsername)
        }
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure that `raw_username` is a valid username.
    pub fn new_unchecked(raw_username: &str) -> Self {
        Self(raw_username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name the user logs in with.
    pub username: Username,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateUsername] if `username` is already registered,
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_user(
    username: Username,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, password) VALUES (?1, ?2)",
        (username.as_ref(), password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        password_hash,
    })
}

/// Get the user registered with `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered user ([Error::NotFound]),
/// - there was an error trying to access the store.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, password FROM user WHERE username = :username")?
        .query_row(&[(":username", username)], map_row)
        .map_err(|error| error.into())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod username_tests {
    use crate::Error;

    use super::Username;

    #[test]
    fn accepts_letters_digits_and_underscores() {
        for raw in ["bob", "alice_99", "ABCDEFGHIJKLMNOP", "  padded  "] {
            assert!(Username::new(raw).is_ok(), "want {raw:?} to be accepted");
        }
    }

    #[test]
    fn trims_whitespace() {
        let username = Username::new("  padded ").unwrap();

        assert_eq!(username.as_ref(), "padded");
    }

    #[test]
    fn rejects_bad_lengths_and_characters() {
        for raw in ["", "ab", "abcdefghijklmnopq", "bob smith", "bob!", "bøb"] {
            assert_eq!(
                Username::new(raw),
                Err(Error::InvalidUsername),
                "want {raw:?} to be rejected"
            );
        }
    }
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, auth::PasswordHash};

    use super::{Username, create_user, create_user_table, get_user_by_username};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user = create_user(
            Username::new_unchecked("alice"),
            password_hash.clone(),
            &db_connection,
        )
        .unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.username.as_ref(), "alice");
        assert_eq!(inserted_user.password_hash, password_hash);
    }

    #[test]
    fn insert_duplicate_username_fails() {
        let db_connection = get_db_connection();
        create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let result = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter3"),
            &db_connection,
        );

        assert_eq!(result, Err(Error::DuplicateUsername));
    }

    #[test]
    fn get_user_fails_with_unknown_username() {
        let db_connection = get_db_connection();

        assert_eq!(
            get_user_by_username("nobody", &db_connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_succeeds_with_existing_user() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        assert_eq!(get_user_by_username("alice", &db_connection), Ok(test_user));
    }
}
