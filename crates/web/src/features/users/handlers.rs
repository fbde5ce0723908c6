use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::user::{UpdateUserRequest, UserResponse},
};

use crate::error::WebError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::CurrentUser;
use crate::provider::ProviderAdmin;

use super::services;

#[utoipa::path(
    get,
    path = "/api/users",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The authenticated user", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users"
)]
pub async fn list_users(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    Ok(Json(vec![UserResponse::from(user)]).into_response())
}

#[utoipa::path(
    get,
    path = "/api/users/{external_id}",
    params(
        ("external_id" = String, Path, description = "Identity provider subject id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(db): State<Database>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(external_id): Path<String>,
) -> Result<Response, WebError> {
    let user = services::get_user(db.pool(), &current, &external_id).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    method(put, patch),
    path = "/api/users/{external_id}",
    params(
        ("external_id" = String, Path, description = "Identity provider subject id")
    ),
    request_body = UpdateUserRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(db): State<Database>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Path(external_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Response, WebError> {
    let user = services::update_user(db.pool(), &current, &external_id, &req).await?;

    Ok(Json(UserResponse::from(user)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/users/{external_id}",
    params(
        ("external_id" = String, Path, description = "Identity provider subject id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "User and all owned data deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the account owner"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(db): State<Database>,
    Extension(CurrentUser(current)): Extension<CurrentUser>,
    Extension(admin): Extension<ProviderAdmin>,
    Path(external_id): Path<String>,
) -> Result<Response, WebError> {
    services::delete_user(db.pool(), &admin, &current, &external_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
