//! Core entry domain types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    amount::Cents,
    auth::UserID,
    database_id::DatabaseId,
    tag::{Tag, TagId},
};

/// Database identifier for an entry.
pub type EntryId = DatabaseId;

/// A dated amount of money in a user's ledger, e.g. a purchase or a pay day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The ID of the entry, assigned on creation.
    pub id: EntryId,
    /// The user that owns the entry.
    pub user_id: UserID,
    /// Free text, may be empty.
    pub description: String,
    /// The amount in cents.
    pub amount_cents: Cents,
    /// Midnight UTC on the date of the entry.
    pub date: OffsetDateTime,
    /// The tag the entry is grouped under, if any.
    pub tag_id: Option<TagId>,
}

/// An entry along with its tag, as shown in the entry history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryWithTag {
    /// The entry itself.
    pub entry: Entry,
    /// The entry's tag, `None` if it is untagged.
    pub tag: Option<Tag>,
}

/// The validated input for creating an entry.
///
/// The amount and date are kept as their parts, they are combined into
/// cents and a UTC midnight timestamp when the entry is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Free text, may be empty.
    pub description: String,
    /// Whole dollars, at most [crate::MAX_DOLLARS].
    pub dollars: u32,
    /// Cents, at most [crate::MAX_CENTS].
    pub cents: u32,
    /// Calendar year of the entry date.
    pub year: i32,
    /// Month of the entry date, starting from 1.
    pub month: u8,
    /// Day of the month.
    pub day: u8,
    /// The tag to group the entry under, if any.
    pub tag_id: Option<TagId>,
}

/// What to do with an entry's tag when updating the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagChange {
    /// Leave the tag as it is.
    #[default]
    Keep,
    /// Remove the tag from the entry.
    Clear,
    /// Tag the entry with the given tag.
    SetTo(TagId),
}

/// The validated input for updating an entry.
///
/// The description, amount and date are always replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryUpdate {
    /// Free text, may be empty.
    pub description: String,
    /// Whole dollars, at most [crate::MAX_DOLLARS].
    pub dollars: u32,
    /// Cents, at most [crate::MAX_CENTS].
    pub cents: u32,
    /// Calendar year of the entry date.
    pub year: i32,
    /// Month of the entry date, starting from 1.
    pub month: u8,
    /// Day of the month.
    pub day: u8,
    /// What to do with the entry's tag.
    pub tag: TagChange,
}
