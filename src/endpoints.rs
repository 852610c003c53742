//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/entries/{entry_id}', use [format_endpoint].

/// The root route which redirects to the ledger page.
pub const ROOT: &str = "/";
/// The landing page for logged in users: month total, new entry form and history.
pub const LEDGER_VIEW: &str = "/ledger";
/// The page for editing an existing entry.
pub const EDIT_ENTRY_VIEW: &str = "/entries/{entry_id}/edit";
/// The page for listing all tags.
pub const TAGS_VIEW: &str = "/tags";
/// The page for creating a new tag.
pub const NEW_TAG_VIEW: &str = "/tags/new";
/// The page for editing an existing tag.
pub const EDIT_TAG_VIEW: &str = "/tags/{tag_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to sign out the current user.
pub const SIGN_OUT: &str = "/api/sign_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The route to create an entry.
pub const ENTRIES_API: &str = "/api/entries";
/// The route to update or delete a single entry.
pub const ENTRY: &str = "/api/entries/{entry_id}";
/// The route to create a tag.
pub const TAGS_API: &str = "/api/tags";
/// The route to update or delete a single tag.
pub const TAG: &str = "/api/tags/{tag_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/tags/{tag_id}/edit', '{tag_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::LEDGER_VIEW,
            endpoints::EDIT_ENTRY_VIEW,
            endpoints::TAGS_VIEW,
            endpoints::NEW_TAG_VIEW,
            endpoints::EDIT_TAG_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::SIGN_OUT,
            endpoints::USERS,
            endpoints::ENTRIES_API,
            endpoints::ENTRY,
            endpoints::TAGS_API,
            endpoints::TAG,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/api/entries/{entry_id}", 1);

        assert_eq!(formatted_path, "/api/entries/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint(endpoints::EDIT_TAG_VIEW, 42);

        assert_eq!(formatted_path, "/tags/42/edit");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
