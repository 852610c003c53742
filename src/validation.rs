//! Field-level validation results shared by the form schemas.
//!
//! Each form is deserialized from the raw, untyped request body and then
//! validated into a typed value. Validation never fails with an [crate::Error]:
//! it either produces the typed value or a [ValidationErrors] listing every
//! field that was rejected and why.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

/// The key used for errors from checks that span several fields.
pub const FORM_ERROR_KEY: &str = "_form";

/// The message used when a required field is missing from the form.
pub const REQUIRED_MESSAGE: &str = "Required";

/// The message used when a field should be a whole number but is not.
pub const NOT_A_NUMBER_MESSAGE: &str = "Expected a whole number";

/// Error messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    /// Create an empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error `message` against `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Record an error from a check across several fields.
    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.add(FORM_ERROR_KEY, message);
    }

    /// Whether no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `field` has any errors.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The error messages for `field`, empty if the field is valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// The error messages from checks across several fields.
    pub fn form_errors(&self) -> &[String] {
        self.messages(FORM_ERROR_KEY)
    }

    /// Return `value` if no errors were recorded, otherwise the errors.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut is_first = true;

        for (field, messages) in &self.0 {
            for message in messages {
                if !is_first {
                    write!(f, "; ")?;
                }

                write!(f, "{field}: {message}")?;
                is_first = false;
            }
        }

        Ok(())
    }
}

/// Get the value of a required text field, recording an error if it is missing.
pub fn required_text<'a>(
    raw: Option<&'a str>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    if raw.is_none() {
        errors.add(field, REQUIRED_MESSAGE);
    }

    raw
}

/// Parse a required whole number field, recording an error if it is missing
/// or not a number.
pub fn required_integer<T: FromStr>(
    raw: Option<&str>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = required_text(raw, field, errors)?.trim();

    if raw.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
        return None;
    }

    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, NOT_A_NUMBER_MESSAGE);
            None
        }
    }
}

/// Parse a required whole number field that must lie within `min..=max`.
pub fn bounded_integer(
    raw: Option<&str>,
    field: &'static str,
    min: i64,
    max: i64,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let value: i64 = required_integer(raw, field, errors)?;

    if value < min {
        errors.add(field, format!("Must be {min} or more"));
        None
    } else if value > max {
        errors.add(field, format!("Must be {max} or less"));
        None
    } else {
        Some(value)
    }
}
