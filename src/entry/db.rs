//! Database operations for entries.
//!
//! Every query is scoped to the owning user, so an entry that belongs to
//! someone else looks the same as one that does not exist.

use rusqlite::{Connection, Row, types::Type};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    amount::{Cents, to_cents},
    auth::UserID,
    calendar::{month_window, to_utc_midnight},
    entry::{Entry, EntryId, EntryUpdate, EntryWithTag, NewEntry, TagChange},
    tag::{TagId, map_row_at},
};

const ENTRY_COLUMNS: &str = "entry.id, entry.user_id, entry.description, entry.amount_cents, \
    entry.date, entry.tag_id";

/// Add an entry to `owner`'s ledger.
///
/// # Errors
///
/// Returns:
/// - [Error::AmountOutOfRange] or [Error::InvalidCalendarDate] if the amount or date parts are invalid,
/// - [Error::TagNotFound] if `new_entry.tag_id` is not one of `owner`'s tags,
/// - [Error::SqlError] for any other SQL error.
pub fn create_entry(
    owner: UserID,
    new_entry: NewEntry,
    connection: &Connection,
) -> Result<Entry, Error> {
    let amount_cents = to_cents(new_entry.dollars, new_entry.cents)?;
    let date = to_utc_midnight(new_entry.year, new_entry.month, new_entry.day)?;

    let transaction = connection.unchecked_transaction()?;

    if let Some(tag_id) = new_entry.tag_id {
        ensure_tag_is_owned(owner, tag_id, &transaction)?;
    }

    let entry = transaction
        .prepare(&format!(
            "INSERT INTO entry (user_id, description, amount_cents, date, tag_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING {ENTRY_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                new_entry.description,
                amount_cents,
                date.unix_timestamp(),
                new_entry.tag_id,
            ),
            map_entry_row,
        )?;

    transaction.commit()?;

    Ok(entry)
}

/// Retrieve one of `owner`'s entries.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such entry or it belongs to another user.
pub fn get_entry(owner: UserID, entry_id: EntryId, connection: &Connection) -> Result<Entry, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE entry.id = :id AND entry.user_id = :user_id"
        ))?
        .query_row(
            &[(":id", &entry_id), (":user_id", &owner.as_i64())],
            map_entry_row,
        )
        .map_err(Error::from)
}

/// Replace the description, amount and date of one of `owner`'s entries and
/// apply the [TagChange] in `update`.
///
/// # Errors
///
/// Returns:
/// - [Error::AmountOutOfRange] or [Error::InvalidCalendarDate] if the amount or date parts are invalid,
/// - [Error::TagNotFound] if the entry is being tagged with a tag `owner` does not have,
/// - [Error::UpdateMissingEntry] if there is no such entry or it belongs to another user,
/// - [Error::SqlError] for any other SQL error.
pub fn update_entry(
    owner: UserID,
    entry_id: EntryId,
    update: EntryUpdate,
    connection: &Connection,
) -> Result<Entry, Error> {
    let amount_cents = to_cents(update.dollars, update.cents)?;
    let date = to_utc_midnight(update.year, update.month, update.day)?;
    let (replace_tag, new_tag_id): (bool, Option<TagId>) = match update.tag {
        TagChange::Keep => (false, None),
        TagChange::Clear => (true, None),
        TagChange::SetTo(tag_id) => (true, Some(tag_id)),
    };

    let transaction = connection.unchecked_transaction()?;

    if let Some(tag_id) = new_tag_id {
        ensure_tag_is_owned(owner, tag_id, &transaction)?;
    }

    let result = transaction
        .prepare(&format!(
            "UPDATE entry
            SET description = ?1,
                amount_cents = ?2,
                date = ?3,
                tag_id = CASE WHEN ?4 THEN ?5 ELSE tag_id END
            WHERE id = ?6 AND user_id = ?7
            RETURNING {ENTRY_COLUMNS}"
        ))?
        .query_row(
            (
                update.description,
                amount_cents,
                date.unix_timestamp(),
                replace_tag,
                new_tag_id,
                entry_id,
                owner.as_i64(),
            ),
            map_entry_row,
        );

    let entry = match result {
        Ok(entry) => entry,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(Error::UpdateMissingEntry),
        Err(error) => return Err(error.into()),
    };

    transaction.commit()?;

    Ok(entry)
}

/// Remove one of `owner`'s entries.
///
/// # Errors
///
/// Returns [Error::DeleteMissingEntry] if there is no such entry or it belongs
/// to another user, including when the entry was already deleted.
pub fn delete_entry(owner: UserID, entry_id: EntryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM entry WHERE id = ?1 AND user_id = ?2",
        (entry_id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingEntry);
    }

    Ok(())
}

/// List all of `owner`'s entries with their tags, newest date first.
///
/// Entries on the same date are listed in the order they were created.
pub fn list_entries(owner: UserID, connection: &Connection) -> Result<Vec<EntryWithTag>, Error> {
    connection
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS}, tag.id, tag.user_id, tag.name, tag.color
            FROM entry
            LEFT JOIN tag ON tag.id = entry.tag_id
            WHERE entry.user_id = :user_id
            ORDER BY entry.date DESC, entry.id ASC"
        ))?
        .query_map(&[(":user_id", &owner.as_i64())], |row| {
            let entry = map_entry_row(row)?;
            let tag = match row.get::<_, Option<TagId>>(6)? {
                Some(_) => Some(map_row_at(row, 6)?),
                None => None,
            };

            Ok(EntryWithTag { entry, tag })
        })?
        .map(|maybe_entry| maybe_entry.map_err(Error::from))
        .collect()
}

/// The sum of `owner`'s entries dated in the same calendar month as `reference`.
///
/// Both the first and last day of the month are included. Returns zero if
/// there are no entries that month.
pub fn month_total(owner: UserID, reference: Date, connection: &Connection) -> Result<Cents, Error> {
    let (start, end) = month_window(reference)?;

    connection
        .query_row(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM entry
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3",
            (owner.as_i64(), start.unix_timestamp(), end.unix_timestamp()),
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Initialize the entry table and indexes.
pub fn create_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS entry (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            date INTEGER NOT NULL,
            tag_id INTEGER,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(tag_id) REFERENCES tag(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entry_user_date ON entry(user_id, date);",
    )?;

    Ok(())
}

fn ensure_tag_is_owned(owner: UserID, tag_id: TagId, connection: &Connection) -> Result<(), Error> {
    let is_owned: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM tag WHERE id = ?1 AND user_id = ?2)",
        (tag_id, owner.as_i64()),
        |row| row.get(0),
    )?;

    if is_owned {
        Ok(())
    } else {
        Err(Error::TagNotFound(tag_id))
    }
}

fn map_entry_row(row: &Row) -> Result<Entry, rusqlite::Error> {
    let timestamp: i64 = row.get(4)?;
    let date = OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(error)))?;

    Ok(Entry {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount_cents: row.get(3)?,
        date,
        tag_id: row.get(5)?,
    })
}
