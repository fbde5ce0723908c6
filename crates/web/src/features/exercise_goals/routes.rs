use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{
    create_exercise_goal, delete_exercise_goal, get_exercise_goal, list_exercise_goals,
    update_exercise_goal,
};
use crate::middleware::auth::{AuthState, require_auth};

pub fn routes(auth: AuthState) -> Router<Database> {
    Router::new()
        .route("/", get(list_exercise_goals).post(create_exercise_goal))
        .route(
            "/:id",
            get(get_exercise_goal)
                .put(update_exercise_goal)
                .delete(delete_exercise_goal),
        )
        .route_layer(middleware::from_fn_with_state(auth, require_auth))
}
