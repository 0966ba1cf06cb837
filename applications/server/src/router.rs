/// HTTP routing
use crate::{api, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Build the application router
///
/// `/users/all` is a static segment, so it wins over `/users/:id` for DELETE.
/// Unmatched paths and verbs answer with the same `{"error": ..}` body as the
/// handlers.
pub fn create_router(app_state: AppState) -> Router {
    use api::fallback::method_not_allowed;

    let user_routes = Router::new()
        .route(
            "/users",
            post(api::users::create_user).fallback(method_not_allowed),
        )
        .route(
            "/users/all",
            delete(api::users::delete_all_users).fallback(method_not_allowed),
        )
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user)
                .fallback(method_not_allowed),
        );

    Router::new()
        .merge(user_routes)
        .route(
            "/health",
            get(api::debug::health).fallback(method_not_allowed),
        )
        .route(
            "/debug/vars",
            get(api::debug::vars).fallback(method_not_allowed),
        )
        .fallback(api::fallback::no_route)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}
