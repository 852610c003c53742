//! The entry form: parsing and validating the raw fields, and rendering them.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    amount::{MAX_CENTS, MAX_DOLLARS, is_non_zero, split_cents},
    calendar::validate_calendar_date,
    entry::{Entry, EntryUpdate, NewEntry, TagChange},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_errors},
    tag::{Tag, TagId},
    validation::{
        NOT_A_NUMBER_MESSAGE, ValidationErrors, bounded_integer, required_integer, required_text,
    },
};

pub const ZERO_AMOUNT_MESSAGE: &str = "Amount must be greater than 0";
pub const INVALID_DATE_MESSAGE: &str = "Invalid date";

/// The raw form data for creating or updating an entry, exactly as posted.
///
/// An empty `tag_id` means "no tag". When updating, a missing `tag_id` means
/// "leave the tag as it is".
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EntryForm {
    pub description: Option<String>,
    pub dollars: Option<String>,
    pub cents: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
    pub tag_id: Option<String>,
}

/// The fields shared by new entries and entry updates.
struct ValidFields {
    description: String,
    dollars: u32,
    cents: u32,
    year: i32,
    month: u8,
    day: u8,
}

impl EntryForm {
    /// An empty form for a new entry, dated `today`.
    pub fn seed(today: Date) -> Self {
        Self {
            description: Some(String::new()),
            dollars: Some("0".to_owned()),
            cents: Some("0".to_owned()),
            year: Some(today.year().to_string()),
            month: Some((today.month() as u8).to_string()),
            day: Some(today.day().to_string()),
            tag_id: Some(String::new()),
        }
    }

    /// Pre-fill the form with an existing entry.
    pub fn from_entry(entry: &Entry) -> Self {
        let (dollars, cents) = split_cents(entry.amount_cents);
        let date = entry.date.date();

        Self {
            description: Some(entry.description.clone()),
            dollars: Some(dollars.to_string()),
            cents: Some(cents.to_string()),
            year: Some(date.year().to_string()),
            month: Some((date.month() as u8).to_string()),
            day: Some(date.day().to_string()),
            tag_id: Some(entry.tag_id.map(|id| id.to_string()).unwrap_or_default()),
        }
    }

    /// Validate the form as a new entry.
    pub fn validate_new(&self) -> Result<NewEntry, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = self.validate_fields(&mut errors);
        let tag_id = parse_tag_id(self.tag_id.as_deref(), &mut errors);

        match (fields, tag_id) {
            (Some(fields), Some(tag_id)) => errors.into_result(NewEntry {
                description: fields.description,
                dollars: fields.dollars,
                cents: fields.cents,
                year: fields.year,
                month: fields.month,
                day: fields.day,
                tag_id,
            }),
            _ => Err(errors),
        }
    }

    /// Validate the form as an update to an existing entry.
    pub fn validate_update(&self) -> Result<EntryUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = self.validate_fields(&mut errors);
        let tag = match self.tag_id.as_deref() {
            None => Some(TagChange::Keep),
            raw => parse_tag_id(raw, &mut errors)
                .map(|tag_id| tag_id.map_or(TagChange::Clear, TagChange::SetTo)),
        };

        match (fields, tag) {
            (Some(fields), Some(tag)) => errors.into_result(EntryUpdate {
                description: fields.description,
                dollars: fields.dollars,
                cents: fields.cents,
                year: fields.year,
                month: fields.month,
                day: fields.day,
                tag,
            }),
            _ => Err(errors),
        }
    }

    fn validate_fields(&self, errors: &mut ValidationErrors) -> Option<ValidFields> {
        let description = required_text(self.description.as_deref(), "description", errors)
            .map(str::to_owned);
        let dollars = bounded_integer(
            self.dollars.as_deref(),
            "dollars",
            0,
            MAX_DOLLARS.into(),
            errors,
        );
        let cents = bounded_integer(self.cents.as_deref(), "cents", 0, MAX_CENTS.into(), errors);
        let year: Option<i32> = required_integer(self.year.as_deref(), "year", errors);
        let month: Option<i64> = required_integer(self.month.as_deref(), "month", errors);
        let day: Option<i64> = required_integer(self.day.as_deref(), "day", errors);

        let (dollars, cents) = match (dollars, cents) {
            (Some(dollars), Some(cents)) => (u32::try_from(dollars).ok()?, u32::try_from(cents).ok()?),
            _ => return None,
        };

        if !is_non_zero(dollars, cents) {
            errors.add_form_error(ZERO_AMOUNT_MESSAGE);
        }

        let (year, month, day) = (year?, month?, day?);
        let date = u8::try_from(month)
            .ok()
            .zip(u8::try_from(day).ok())
            .filter(|&(month, day)| validate_calendar_date(year, month, day));

        let Some((month, day)) = date else {
            errors.add_form_error(INVALID_DATE_MESSAGE);
            return None;
        };

        Some(ValidFields {
            description: description?,
            dollars,
            cents,
            year,
            month,
            day,
        })
    }
}

/// Parse an optional tag ID, `None` or a blank string means no tag.
///
/// Returns `None` if the ID is not a number, `Some(None)` for no tag.
fn parse_tag_id(raw: Option<&str>, errors: &mut ValidationErrors) -> Option<Option<TagId>> {
    let raw = raw.map(str::trim).unwrap_or_default();

    if raw.is_empty() {
        return Some(None);
    }

    match raw.parse() {
        Ok(tag_id) => Some(Some(tag_id)),
        Err(_) => {
            errors.add("tag_id", NOT_A_NUMBER_MESSAGE);
            None
        }
    }
}

/// Render the inputs of the entry form, without the surrounding `<form>`.
pub fn entry_form_fields(values: &EntryForm, errors: &ValidationErrors, tags: &[Tag]) -> Markup {
    let selected_tag = values.tag_id.as_deref().unwrap_or_default();

    html! {
        @if !errors.form_errors().is_empty() {
            div id="form-errors" { (field_errors(errors.form_errors())) }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                id="description"
                type="text"
                name="description"
                placeholder="e.g. Coffee"
                value=[values.description.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);

            (field_errors(errors.messages("description")))
        }

        div class="grid grid-cols-2 gap-4"
        {
            div
            {
                label for="dollars" class=(FORM_LABEL_STYLE) { "Dollars" }

                div class="input-wrapper w-full"
                {
                    input
                        id="dollars"
                        type="number"
                        name="dollars"
                        min="0"
                        max=(MAX_DOLLARS)
                        step="1"
                        value=[values.dollars.as_deref()]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (field_errors(errors.messages("dollars")))
            }

            div
            {
                label for="cents" class=(FORM_LABEL_STYLE) { "Cents" }

                input
                    id="cents"
                    type="number"
                    name="cents"
                    min="0"
                    max=(MAX_CENTS)
                    step="1"
                    value=[values.cents.as_deref()]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_errors(errors.messages("cents")))
            }
        }

        div class="grid grid-cols-3 gap-4"
        {
            @for (name, label, min, max) in [("year", "Year", 1, 9999), ("month", "Month", 1, 12), ("day", "Day", 1, 31)] {
                div
                {
                    label for=(name) class=(FORM_LABEL_STYLE) { (label) }

                    input
                        id=(name)
                        type="number"
                        name=(name)
                        min=(min)
                        max=(max)
                        step="1"
                        value=[date_value(values, name)]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_errors(errors.messages(name)))
                }
            }
        }

        div
        {
            label for="tag_id" class=(FORM_LABEL_STYLE) { "Tag" }

            select id="tag_id" name="tag_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected_tag.is_empty()] { "No tag" }

                @for tag in tags {
                    @let tag_id = tag.id.to_string();
                    option value=(tag_id) selected[selected_tag == tag_id] { (tag.name) }
                }
            }

            (field_errors(errors.messages("tag_id")))
        }
    }
}

fn date_value<'a>(values: &'a EntryForm, name: &str) -> Option<&'a str> {
    match name {
        "year" => values.year.as_deref(),
        "month" => values.month.as_deref(),
        _ => values.day.as_deref(),
    }
}

#[cfg(test)]
mod entry_form_tests {
    use time::macros::{date, datetime};

    use crate::{
        auth::UserID,
        entry::{Entry, EntryUpdate, NewEntry, TagChange},
        validation::{NOT_A_NUMBER_MESSAGE, REQUIRED_MESSAGE},
    };

    use super::{EntryForm, INVALID_DATE_MESSAGE, ZERO_AMOUNT_MESSAGE};

    fn coffee_form() -> EntryForm {
        EntryForm {
            description: Some("Coffee".to_owned()),
            dollars: Some("3".to_owned()),
            cents: Some("50".to_owned()),
            year: Some("2024".to_owned()),
            month: Some("6".to_owned()),
            day: Some("15".to_owned()),
            tag_id: None,
        }
    }

    #[test]
    fn description_is_kept_as_typed() {
        let form = EntryForm {
            description: Some("  Coffee  ".to_owned()),
            ..coffee_form()
        };

        let new_entry = form.validate_new().expect("form should be valid");
        let update = form.validate_update().expect("form should be valid");

        assert_eq!(new_entry.description, "  Coffee  ");
        assert_eq!(update.description, "  Coffee  ");
    }

    #[test]
    fn valid_new_entry() {
        assert_eq!(
            coffee_form().validate_new(),
            Ok(NewEntry {
                description: "Coffee".to_owned(),
                dollars: 3,
                cents: 50,
                year: 2024,
                month: 6,
                day: 15,
                tag_id: None,
            })
        );
    }

    #[test]
    fn new_entry_with_tag() {
        let form = EntryForm {
            tag_id: Some("7".to_owned()),
            ..coffee_form()
        };

        assert_eq!(form.validate_new().unwrap().tag_id, Some(7));
    }

    #[test]
    fn blank_tag_is_no_tag_for_new_entries() {
        let form = EntryForm {
            tag_id: Some("".to_owned()),
            ..coffee_form()
        };

        assert_eq!(form.validate_new().unwrap().tag_id, None);
    }

    #[test]
    fn update_tag_change_follows_tag_id() {
        let keep = coffee_form();
        let clear = EntryForm {
            tag_id: Some("".to_owned()),
            ..coffee_form()
        };
        let set = EntryForm {
            tag_id: Some("3".to_owned()),
            ..coffee_form()
        };

        assert_eq!(keep.validate_update().unwrap().tag, TagChange::Keep);
        assert_eq!(clear.validate_update().unwrap().tag, TagChange::Clear);
        assert_eq!(set.validate_update().unwrap().tag, TagChange::SetTo(3));
    }

    #[test]
    fn valid_update() {
        assert_eq!(
            coffee_form().validate_update(),
            Ok(EntryUpdate {
                description: "Coffee".to_owned(),
                dollars: 3,
                cents: 50,
                year: 2024,
                month: 6,
                day: 15,
                tag: TagChange::Keep,
            })
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let form = EntryForm {
            dollars: Some("0".to_owned()),
            cents: Some("0".to_owned()),
            ..coffee_form()
        };

        let new_errors = form.validate_new().unwrap_err();
        let update_errors = form.validate_update().unwrap_err();

        assert_eq!(new_errors.form_errors(), [ZERO_AMOUNT_MESSAGE]);
        assert_eq!(update_errors.form_errors(), [ZERO_AMOUNT_MESSAGE]);
    }

    #[test]
    fn amount_parts_are_bounded() {
        let form = EntryForm {
            dollars: Some("1000000".to_owned()),
            cents: Some("100".to_owned()),
            ..coffee_form()
        };

        let errors = form.validate_new().unwrap_err();

        assert_eq!(errors.messages("dollars"), ["Must be 999999 or less"]);
        assert_eq!(errors.messages("cents"), ["Must be 99 or less"]);
    }

    #[test]
    fn negative_amount_parts_are_rejected() {
        let form = EntryForm {
            dollars: Some("-1".to_owned()),
            ..coffee_form()
        };

        let errors = form.validate_new().unwrap_err();

        assert_eq!(errors.messages("dollars"), ["Must be 0 or more"]);
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for (year, month, day) in [("2023", "2", "29"), ("2023", "4", "31"), ("2024", "13", "1"), ("2024", "1", "0")] {
            let form = EntryForm {
                year: Some(year.to_owned()),
                month: Some(month.to_owned()),
                day: Some(day.to_owned()),
                ..coffee_form()
            };

            let errors = form.validate_new().unwrap_err();

            assert_eq!(
                errors.form_errors(),
                [INVALID_DATE_MESSAGE],
                "want {year}-{month}-{day} to be rejected"
            );
        }
    }

    #[test]
    fn leap_day_is_accepted() {
        let form = EntryForm {
            year: Some("2024".to_owned()),
            month: Some("2".to_owned()),
            day: Some("29".to_owned()),
            ..coffee_form()
        };

        assert!(form.validate_new().is_ok());
    }

    #[test]
    fn missing_fields_are_reported() {
        let errors = EntryForm::default().validate_new().unwrap_err();

        for field in ["description", "dollars", "cents", "year", "month", "day"] {
            assert_eq!(errors.messages(field), [REQUIRED_MESSAGE], "field {field}");
        }
        assert!(!errors.has("tag_id"));
    }

    #[test]
    fn non_numeric_tag_is_rejected() {
        let form = EntryForm {
            tag_id: Some("groceries".to_owned()),
            ..coffee_form()
        };

        assert_eq!(
            form.validate_new().unwrap_err().messages("tag_id"),
            [NOT_A_NUMBER_MESSAGE]
        );
        assert_eq!(
            form.validate_update().unwrap_err().messages("tag_id"),
            [NOT_A_NUMBER_MESSAGE]
        );
    }

    #[test]
    fn empty_description_is_allowed() {
        let form = EntryForm {
            description: Some("".to_owned()),
            ..coffee_form()
        };

        assert_eq!(form.validate_new().unwrap().description, "");
    }

    #[test]
    fn seed_and_from_entry_fill_fields() {
        let seeded = EntryForm::seed(date!(2024 - 06 - 15));
        assert_eq!(seeded.dollars.as_deref(), Some("0"));
        assert_eq!(seeded.year.as_deref(), Some("2024"));
        assert_eq!(seeded.month.as_deref(), Some("6"));
        assert_eq!(seeded.day.as_deref(), Some("15"));

        let entry = Entry {
            id: 1,
            user_id: UserID::new(1),
            description: "Coffee".to_owned(),
            amount_cents: 1205,
            date: datetime!(2024-06-15 0:00 UTC),
            tag_id: Some(4),
        };
        let form = EntryForm::from_entry(&entry);
        assert_eq!(form.dollars.as_deref(), Some("12"));
        assert_eq!(form.cents.as_deref(), Some("5"));
        assert_eq!(form.tag_id.as_deref(), Some("4"));
        assert_eq!(form.validate_update().unwrap().tag, TagChange::SetTo(4));
    }
}
