//! Core tag domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, auth::UserID, database_id::DatabaseId};

/// A validated, non-empty tag name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTagName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyTagName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a tag name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TagName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagName::new(s)
    }
}

impl Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A color used when displaying a tag, either a hex code such as "#3b82f6"
/// or a CSS color name such as "teal".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TagColor(String);

impl TagColor {
    /// The color given to tags when the user does not pick one.
    pub const DEFAULT: &str = "#3b82f6";

    /// Create a tag color.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyTagColor] if `color` is an empty string,
    /// - [Error::InvalidTagColor] if `color` is neither a 3 or 6 digit hex
    ///   code nor a name made of ASCII letters.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        if color.is_empty() {
            return Err(Error::EmptyTagColor);
        }

        let is_hex_code = color.strip_prefix('#').is_some_and(|digits| {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        });
        let is_color_name = color.chars().all(|c| c.is_ascii_alphabetic());

        if is_hex_code || is_color_name {
            Ok(Self(color.to_string()))
        } else {
            Err(Error::InvalidTagColor)
        }
    }

    /// Create a tag color without validation.
    ///
    /// The caller should ensure that the string is a hex code or color name.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl AsRef<str> for TagColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TagColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a tag.
pub type TagId = DatabaseId;

/// A user-defined label for entries (e.g., 'Groceries', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Tag {
    /// The ID of the tag.
    pub id: TagId,
    /// The user that created the tag.
    pub user_id: UserID,
    /// The name shown for the tag.
    pub name: TagName,
    /// The color the tag is displayed with.
    pub color: TagColor,
}

#[cfg(test)]
mod tag_name_tests {
    use crate::{
        Error,
        tag::{TagColor, TagName},
    };

    #[test]
    fn new_fails_on_empty_string() {
        let tag_name = TagName::new("");

        assert_eq!(tag_name, Err(Error::EmptyTagName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let tag_name = TagName::new("\n\t \r");

        assert_eq!(tag_name, Err(Error::EmptyTagName));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let tag_name = TagName::new("🔥");

        assert!(tag_name.is_ok())
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let tag_name = TagName::new("  Groceries ").unwrap();

        assert_eq!(tag_name.as_ref(), "Groceries");
    }

    #[test]
    fn color_fails_on_empty_string() {
        assert_eq!(TagColor::new(" "), Err(Error::EmptyTagColor));
        assert_eq!(TagColor::new("teal").unwrap().as_ref(), "teal");
    }

    #[test]
    fn color_accepts_hex_codes() {
        assert_eq!(TagColor::new("#3b82f6").unwrap().as_ref(), "#3b82f6");
        assert_eq!(TagColor::new(" #FFF ").unwrap().as_ref(), "#FFF");
    }

    #[test]
    fn color_rejects_css_injection() {
        for color in [
            "red; background-image:url(https://example.com/x.png)",
            "#12345",
            "#ggg",
            "rgb(1, 2, 3)",
            "red\"",
        ] {
            assert_eq!(TagColor::new(color), Err(Error::InvalidTagColor), "{color}");
        }
    }
}
