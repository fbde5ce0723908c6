use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        exercise::{DirectoryQuery, ExerciseHistoryEntry, HistoryQuery, LastPerformanceQuery},
        workout::ExerciseResponse,
    },
    error::StorageError,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercises",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every exercise in the user's workouts", body = Vec<ExerciseResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn list_exercises(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let exercises = services::list_exercises(db.pool(), user.user_id).await?;

    let response: Vec<ExerciseResponse> =
        exercises.into_iter().map(ExerciseResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Exercise with its sets", body = ExerciseResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Exercise belongs to another user"),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn get_exercise(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let exercise = services::get_exercise(db.pool(), user.user_id, id).await?;

    Ok(Json(ExerciseResponse::from(exercise)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/last-performance",
    params(LastPerformanceQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The exercise from the most recent earlier workout, or null", body = Option<ExerciseResponse>),
        (status = 400, description = "Missing query parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workout not found")
    ),
    tag = "exercises"
)]
pub async fn last_performance(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<LastPerformanceQuery>,
) -> Result<Response, WebError> {
    let (Some(name), Some(workout_id)) = (query.name.filter(|n| !n.is_empty()), query.workout_id)
    else {
        return Err(WebError::BadRequest(
            "Missing 'name' or 'workout_id' query parameters".to_string(),
        ));
    };

    let exercise = services::last_performance(db.pool(), user.user_id, &name, workout_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::NotFound("Workout not found"),
            other => other.into(),
        })?;

    Ok(Json(exercise.map(ExerciseResponse::from)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/directory",
    params(DirectoryQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Distinct exercise names, most recently performed first", body = Vec<String>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn exercise_directory(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Response, WebError> {
    let names = services::directory(db.pool(), user.user_id, query.search.as_deref()).await?;

    Ok(Json(names).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/history",
    params(HistoryQuery),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Every performance of the exercise, oldest first", body = Vec<ExerciseHistoryEntry>),
        (status = 400, description = "Missing exercise_name"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercises"
)]
pub async fn exercise_history(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, WebError> {
    let Some(name) = query.exercise_name.filter(|n| !n.is_empty()) else {
        return Err(WebError::BadRequest(
            "Missing 'exercise_name' query parameter".to_string(),
        ));
    };

    let entries: Vec<ExerciseHistoryEntry> = services::history(db.pool(), user.user_id, &name)
        .await?
        .into_iter()
        .map(|(tree, date)| ExerciseHistoryEntry::new(tree, date))
        .collect();

    Ok(Json(entries).into_response())
}
