use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::auth::{require_read_flags, require_write_flags};
use crate::state::AppState;

use super::controller::{create_flag, delete_flag, get_flag_by_id, list_flags, update_flag};

/// Read routes require `read:flags`; mutating routes require `write:flags`.
/// The two groups carry their own authorization layer and are merged back
/// into one path space.
pub fn init_flags_router(state: AppState) -> Router<AppState> {
    let viewer_routes = Router::new()
        .route("/", get(list_flags))
        .route("/{id}", get(get_flag_by_id))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_read_flags,
        ));

    let editor_routes = Router::new()
        .route("/", post(create_flag))
        .route("/{id}", put(update_flag).delete(delete_flag))
        .route_layer(middleware::from_fn_with_state(state, require_write_flags));

    viewer_routes.merge(editor_routes)
}
