use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{create_workout, delete_workout, get_workout, list_workouts, update_workout};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route(
            "/:id",
            get(get_workout)
                .put(update_workout)
                .patch(update_workout)
                .delete(delete_workout),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
