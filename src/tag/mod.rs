//! Tags: user-defined, colored labels for entries.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod form;
mod list;

pub use create::{create_tag_endpoint, get_new_tag_page};
pub use db::{create_tag, create_tag_table, get_tag, list_tags, update_tag};
pub(crate) use db::map_row_at;
pub use delete::delete_tag_endpoint;
pub use domain::{Tag, TagColor, TagId, TagName};
pub use edit::{get_edit_tag_page, update_tag_endpoint};
pub use list::get_tags_page;
