use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::exercise_goal::{
        CreateExerciseGoalRequest, ExerciseGoalFilter, ExerciseGoalResponse,
        UpdateExerciseGoalRequest,
    },
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercise-goals",
    params(ExerciseGoalFilter),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The user's exercise goals", body = Vec<ExerciseGoalResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "exercise-goals"
)]
pub async fn list_exercise_goals(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(filter): Query<ExerciseGoalFilter>,
) -> Result<Response, WebError> {
    let goals =
        services::list_goals(db.pool(), user.user_id, filter.exercise_name.as_deref()).await?;

    let response: Vec<ExerciseGoalResponse> =
        goals.into_iter().map(ExerciseGoalResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercise-goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise goal id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Exercise goal found", body = ExerciseGoalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Exercise goal not found")
    ),
    tag = "exercise-goals"
)]
pub async fn get_exercise_goal(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let goal = services::get_goal(db.pool(), user.user_id, id).await?;

    Ok(Json(ExerciseGoalResponse::from(goal)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/exercise-goals",
    request_body = CreateExerciseGoalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Exercise goal created", body = ExerciseGoalResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A goal for this exercise already exists")
    ),
    tag = "exercise-goals"
)]
pub async fn create_exercise_goal(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<CreateExerciseGoalRequest>,
) -> Result<Response, WebError> {
    let goal = services::create_goal(db.pool(), user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(ExerciseGoalResponse::from(goal))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/exercise-goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise goal id")
    ),
    request_body = UpdateExerciseGoalRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Exercise goal updated", body = ExerciseGoalResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Exercise goal not found"),
        (status = 409, description = "A goal for this exercise already exists")
    ),
    tag = "exercise-goals"
)]
pub async fn update_exercise_goal(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateExerciseGoalRequest>,
) -> Result<Response, WebError> {
    let goal = services::update_goal(db.pool(), user.user_id, id, &req).await?;

    Ok(Json(ExerciseGoalResponse::from(goal)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/exercise-goals/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise goal id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Exercise goal deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Exercise goal not found")
    ),
    tag = "exercise-goals"
)]
pub async fn delete_exercise_goal(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_goal(db.pool(), user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
