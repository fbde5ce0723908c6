use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{delete_user, get_user, list_users, update_user};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/:external_id",
            get(get_user)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
