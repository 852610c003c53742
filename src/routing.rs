//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_register_page, post_log_in,
        post_sign_out, register_user,
    },
    endpoints,
    entry::{
        create_entry_endpoint, delete_entry_endpoint, get_edit_entry_page, get_ledger_page,
        update_entry_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    tag::{
        create_tag_endpoint, delete_tag_endpoint, get_edit_tag_page, get_new_tag_page,
        get_tags_page, update_tag_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::SIGN_OUT, post(post_sign_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LEDGER_VIEW, get(get_ledger_page))
        .route(endpoints::EDIT_ENTRY_VIEW, get(get_edit_entry_page))
        .route(endpoints::TAGS_VIEW, get(get_tags_page))
        .route(endpoints::NEW_TAG_VIEW, get(get_new_tag_page))
        .route(endpoints::EDIT_TAG_VIEW, get(get_edit_tag_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::ENTRIES_API, post(create_entry_endpoint))
            .route(
                endpoints::ENTRY,
                put(update_entry_endpoint).delete(delete_entry_endpoint),
            )
            .route(endpoints::TAGS_API, post(create_tag_endpoint))
            .route(
                endpoints::TAG,
                put(update_tag_endpoint).delete(delete_tag_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the ledger page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LEDGER_VIEW)
}
