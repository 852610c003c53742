//! Database operations for tags.
//!
//! Every query is scoped to the owning user. A tag that belongs to someone
//! else is treated exactly like a tag that does not exist.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    auth::UserID,
    tag::{Tag, TagColor, TagId, TagName},
};

/// Create a tag owned by `owner` and return it with its generated ID.
pub fn create_tag(
    owner: UserID,
    name: TagName,
    color: TagColor,
    connection: &Connection,
) -> Result<Tag, Error> {
    connection
        .prepare(
            "INSERT INTO tag (user_id, name, color) VALUES (?1, ?2, ?3)
            RETURNING id, user_id, name, color;",
        )?
        .query_row(
            (owner.as_i64(), name.as_ref(), color.as_ref()),
            map_row,
        )
        .map_err(Error::from)
}

/// Retrieve a single tag owned by `owner`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such tag or it belongs to another user.
pub fn get_tag(owner: UserID, tag_id: TagId, connection: &Connection) -> Result<Tag, Error> {
    connection
        .prepare("SELECT id, user_id, name, color FROM tag WHERE id = :id AND user_id = :user_id;")?
        .query_row(
            &[(":id", &tag_id), (":user_id", &owner.as_i64())],
            map_row,
        )
        .map_err(Error::from)
}

/// Retrieve all of `owner`'s tags ordered alphabetically by name.
pub fn list_tags(owner: UserID, connection: &Connection) -> Result<Vec<Tag>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, color FROM tag
            WHERE user_id = :user_id
            ORDER BY name ASC, id ASC;",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], map_row)?
        .map(|maybe_tag| maybe_tag.map_err(Error::from))
        .collect()
}

/// Replace the name and color of one of `owner`'s tags.
///
/// # Errors
///
/// Returns [Error::UpdateMissingTag] if there is no such tag or it belongs to another user.
pub fn update_tag(
    owner: UserID,
    tag_id: TagId,
    name: TagName,
    color: TagColor,
    connection: &Connection,
) -> Result<Tag, Error> {
    let result = connection
        .prepare(
            "UPDATE tag SET name = ?1, color = ?2 WHERE id = ?3 AND user_id = ?4
            RETURNING id, user_id, name, color;",
        )?
        .query_row(
            (name.as_ref(), color.as_ref(), tag_id, owner.as_i64()),
            map_row,
        );

    match result {
        Ok(tag) => Ok(tag),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::UpdateMissingTag),
        Err(error) => Err(error.into()),
    }
}

/// Delete one of `owner`'s tags.
///
/// Entries that used the tag are kept and become untagged.
///
/// # Errors
///
/// Returns [Error::DeleteMissingTag] if there is no such tag or it belongs to another user.
pub fn delete_tag(owner: UserID, tag_id: TagId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM tag WHERE id = ?1 AND user_id = ?2",
        (tag_id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTag);
    }

    Ok(())
}

/// Count how many of `owner`'s entries use each of their tags.
///
/// Tags without any entries are included with a count of zero. The result
/// is in the same order as [list_tags].
pub fn count_entries_per_tag(
    owner: UserID,
    connection: &Connection,
) -> Result<Vec<(Tag, u64)>, Error> {
    connection
        .prepare(
            "SELECT tag.id, tag.user_id, tag.name, tag.color, COUNT(entry.id)
            FROM tag
            LEFT JOIN entry ON entry.tag_id = tag.id
            WHERE tag.user_id = :user_id
            GROUP BY tag.id
            ORDER BY tag.name ASC, tag.id ASC;",
        )?
        .query_map(&[(":user_id", &owner.as_i64())], |row| {
            let count: i64 = row.get(4)?;
            let count = u64::try_from(count).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(error))
            })?;

            Ok((map_row(row)?, count))
        })?
        .map(|maybe_count| maybe_count.map_err(Error::from))
        .collect()
}

/// Initialize the tag table and indexes.
pub fn create_tag_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS tag (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_tag_user_name ON tag(user_id, name);",
    )?;

    Ok(())
}

/// Map a row of `id, user_id, name, color` to a [Tag].
pub(crate) fn map_row(row: &Row) -> Result<Tag, rusqlite::Error> {
    map_row_at(row, 0)
}

/// Map the four tag columns starting at column `offset` to a [Tag].
pub(crate) fn map_row_at(row: &Row, offset: usize) -> Result<Tag, rusqlite::Error> {
    let id = row.get(offset)?;
    let user_id = UserID::new(row.get(offset + 1)?);
    let raw_name: String = row.get(offset + 2)?;
    let raw_color: String = row.get(offset + 3)?;

    Ok(Tag {
        id,
        user_id,
        name: TagName::new_unchecked(&raw_name),
        color: TagColor::new_unchecked(&raw_color),
    })
}
