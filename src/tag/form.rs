//! The form shared by the new and edit tag pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_errors},
    tag::{Tag, TagColor, TagName},
    validation::{ValidationErrors, required_text},
};

/// The raw form data for creating or updating a tag.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TagForm {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TagForm {
    /// Pre-fill the form with an existing tag.
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            name: Some(tag.name.to_string()),
            color: Some(tag.color.to_string()),
        }
    }

    /// Check that both fields are present and not blank.
    pub fn validate(&self) -> Result<(TagName, TagColor), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(self.name.as_deref(), "name", &mut errors)
            .and_then(|name| record(TagName::new(name), "name", &mut errors));
        let color = required_text(self.color.as_deref(), "color", &mut errors)
            .and_then(|color| record(TagColor::new(color), "color", &mut errors));

        match (name, color) {
            (Some(name), Some(color)) => errors.into_result((name, color)),
            _ => Err(errors),
        }
    }
}

fn record<T>(
    result: Result<T, crate::Error>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    result
        .map_err(|error| errors.add(field, error.to_string()))
        .ok()
}

/// How the form submits: which endpoint, with which HTTP method.
pub enum TagFormAction<'a> {
    Create { endpoint: &'a str },
    Update { endpoint: &'a str },
}

/// Render the tag form with `values` filled in and any `errors` shown under their field.
pub fn tag_form_view(
    action: TagFormAction<'_>,
    values: &TagForm,
    errors: &ValidationErrors,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match action {
        TagFormAction::Create { endpoint } => (Some(endpoint), None, "Create Tag"),
        TagFormAction::Update { endpoint } => (None, Some(endpoint), "Save Changes"),
    };
    let color = values.color.as_deref().unwrap_or(TagColor::DEFAULT);

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-400="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Tag Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Tag Name"
                    value=[values.name.as_deref()]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_errors(errors.messages("name")))
            }

            div
            {
                label for="color" class=(FORM_LABEL_STYLE) { "Color" }

                input
                    id="color"
                    type="color"
                    name="color"
                    value=(color)
                    required
                    class="h-10 w-20 rounded cursor-pointer";

                (field_errors(errors.messages("color")))
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

#[cfg(test)]
mod tag_form_tests {
    use crate::{
        tag::{TagColor, TagName},
        validation::REQUIRED_MESSAGE,
    };

    use super::TagForm;

    #[test]
    fn accepts_name_and_color() {
        let form = TagForm {
            name: Some(" Groceries ".to_owned()),
            color: Some("#22c55e".to_owned()),
        };

        assert_eq!(
            form.validate(),
            Ok((
                TagName::new_unchecked("Groceries"),
                TagColor::new_unchecked("#22c55e")
            ))
        );
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = TagForm::default().validate().unwrap_err();

        assert_eq!(errors.messages("name"), [REQUIRED_MESSAGE]);
        assert_eq!(errors.messages("color"), [REQUIRED_MESSAGE]);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let form = TagForm {
            name: Some("  ".to_owned()),
            color: Some("".to_owned()),
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.messages("name"), ["Tag name cannot be empty"]);
        assert_eq!(errors.messages("color"), ["Tag color cannot be empty"]);
    }

    #[test]
    fn color_with_extra_css_is_rejected() {
        let form = TagForm {
            name: Some("Food".to_owned()),
            color: Some("red; background-image:url(x)".to_owned()),
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(
            errors.messages("color"),
            ["Tag color must be a hex code like #3b82f6 or a color name"]
        );
    }
}
