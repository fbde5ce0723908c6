use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::template::{CreateTemplateRequest, TemplateResponse, UpdateTemplateRequest},
};
use uuid::Uuid;

use crate::error::WebError;
use crate::extract::ValidatedJson;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/api/workout-templates",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The user's templates with their exercises and sets", body = Vec<TemplateResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "templates"
)]
pub async fn list_templates(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, WebError> {
    let templates = services::list_templates(db.pool(), user.user_id).await?;

    let response: Vec<TemplateResponse> =
        templates.into_iter().map(TemplateResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workout-templates/{id}",
    params(
        ("id" = Uuid, Path, description = "Template id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Template found", body = TemplateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Template belongs to another user"),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn get_template(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let template = services::get_template(db.pool(), user.user_id, id).await?;

    Ok(Json(TemplateResponse::from(template)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workout-templates",
    request_body = CreateTemplateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Template created with its exercises and sets", body = TemplateResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "templates"
)]
pub async fn create_template(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<CreateTemplateRequest>,
) -> Result<Response, WebError> {
    let template = services::create_template(db.pool(), user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))).into_response())
}

#[utoipa::path(
    method(put, patch),
    path = "/api/workout-templates/{id}",
    params(
        ("id" = Uuid, Path, description = "Template id")
    ),
    request_body = UpdateTemplateRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Template updated; a present exercise list replaces all exercise templates", body = TemplateResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Template belongs to another user"),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn update_template(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTemplateRequest>,
) -> Result<Response, WebError> {
    let template = services::update_template(db.pool(), user.user_id, id, &req).await?;

    Ok(Json(TemplateResponse::from(template)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workout-templates/{id}",
    params(
        ("id" = Uuid, Path, description = "Template id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Template deleted; workouts made from it are kept"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Template belongs to another user"),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn delete_template(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_template(db.pool(), user.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/workout-templates/{id}/duplicate",
    params(
        ("id" = Uuid, Path, description = "Template to copy")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Copy created as \"<name> (Copy)\"", body = TemplateResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Template belongs to another user"),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn duplicate_template(
    State(db): State<Database>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let copy = services::duplicate_template(db.pool(), user.user_id, id)
        .await?
        .ok_or(WebError::NotFound("Template not found"))?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(copy))).into_response())
}
