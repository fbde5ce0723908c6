use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{
    exercise_directory, exercise_history, get_exercise, last_performance, list_exercises,
};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route("/", get(list_exercises))
        .route("/last-performance", get(last_performance))
        .route("/directory", get(exercise_directory))
        .route("/history", get(exercise_history))
        .route("/:id", get(get_exercise))
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
