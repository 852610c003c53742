//! Ledger entries: dated, optionally tagged amounts of money.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod ledger_page;

pub use create::create_entry_endpoint;
pub use db::{
    create_entry, create_entry_table, delete_entry, get_entry, list_entries, month_total,
    update_entry,
};
pub use delete::delete_entry_endpoint;
pub use domain::{Entry, EntryId, EntryUpdate, EntryWithTag, NewEntry, TagChange};
pub use edit::{get_edit_entry_page, update_entry_endpoint};
pub use ledger_page::get_ledger_page;
