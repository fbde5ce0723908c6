use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{
    create_custom_exercise_name, delete_custom_exercise_name, get_custom_exercise_name,
    list_custom_exercise_names, update_custom_exercise_name,
};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route(
            "/",
            get(list_custom_exercise_names).post(create_custom_exercise_name),
        )
        .route(
            "/:id",
            get(get_custom_exercise_name)
                .put(update_custom_exercise_name)
                .delete(delete_custom_exercise_name),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
