use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{
    create_template, delete_template, duplicate_template, get_template, list_templates,
    update_template,
};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/:id",
            get(get_template)
                .put(update_template)
                .patch(update_template)
                .delete(delete_template),
        )
        .route("/:id/duplicate", post(duplicate_template))
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
