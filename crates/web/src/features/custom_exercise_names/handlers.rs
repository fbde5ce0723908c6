use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::custom_exercise_name::{CustomExerciseNameRequest, CustomExerciseNameResponse},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/custom-exercise-names",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The user's custom exercise names", body = Vec<CustomExerciseNameResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "custom-exercise-names"
)]
pub async fn list_custom_exercise_names(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let names = services::list_names(db.pool(), user.user_id).await?;

    let response: Vec<CustomExerciseNameResponse> = names
        .into_iter()
        .map(CustomExerciseNameResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/custom-exercise-names/{id}",
    params(
        ("id" = Uuid, Path, description = "Custom exercise name id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Custom exercise name found", body = CustomExerciseNameResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Custom exercise name not found")
    ),
    tag = "custom-exercise-names"
)]
pub async fn get_custom_exercise_name(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let name = services::get_name(db.pool(), user.user_id, id).await?;

    Ok(Json(CustomExerciseNameResponse::from(name)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/custom-exercise-names",
    request_body = CustomExerciseNameRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Custom exercise name created", body = CustomExerciseNameResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name already exists")
    ),
    tag = "custom-exercise-names"
)]
pub async fn create_custom_exercise_name(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<CustomExerciseNameRequest>,
) -> Result<Response, WebError> {
    let name = services::create_name(db.pool(), user.user_id, &req.name).await?;

    Ok((StatusCode::CREATED, Json(CustomExerciseNameResponse::from(name))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/custom-exercise-names/{id}",
    params(
        ("id" = Uuid, Path, description = "Custom exercise name id")
    ),
    request_body = CustomExerciseNameRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Custom exercise name renamed", body = CustomExerciseNameResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Custom exercise name not found"),
        (status = 409, description = "Name already exists")
    ),
    tag = "custom-exercise-names"
)]
pub async fn update_custom_exercise_name(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CustomExerciseNameRequest>,
) -> Result<Response, WebError> {
    let name = services::rename(db.pool(), user.user_id, id, &req.name).await?;

    Ok(Json(CustomExerciseNameResponse::from(name)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/custom-exercise-names/{id}",
    params(
        ("id" = Uuid, Path, description = "Custom exercise name id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Custom exercise name deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Belongs to another user"),
        (status = 404, description = "Custom exercise name not found")
    ),
    tag = "custom-exercise-names"
)]
pub async fn delete_custom_exercise_name(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_name(db.pool(), user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
