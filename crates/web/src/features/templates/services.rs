use sqlx::PgPool;
use storage::{
    dto::template::{CreateTemplateRequest, UpdateTemplateRequest},
    error::Result,
    models::TemplateTree,
    repository::TemplateRepository,
    services::composition,
};
use uuid::Uuid;

pub async fn list_templates(pool: &PgPool, user_id: Uuid) -> Result<Vec<TemplateTree>> {
    let repo = TemplateRepository::new(pool);
    repo.list_for_user(user_id).await
}

pub async fn get_template(pool: &PgPool, user_id: Uuid, template_id: Uuid) -> Result<TemplateTree> {
    let repo = TemplateRepository::new(pool);
    repo.find_owned(user_id, template_id).await
}

pub async fn create_template(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateTemplateRequest,
) -> Result<TemplateTree> {
    composition::create_template_with_exercises(pool, user_id, request).await
}

pub async fn update_template(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    request: &UpdateTemplateRequest,
) -> Result<TemplateTree> {
    composition::replace_template_contents(pool, user_id, template_id, request).await
}

/// Workouts made from the template keep existing, unlinked
pub async fn delete_template(pool: &PgPool, user_id: Uuid, template_id: Uuid) -> Result<()> {
    let repo = TemplateRepository::new(pool);
    repo.delete_owned(user_id, template_id).await
}

pub async fn duplicate_template(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
) -> Result<Option<TemplateTree>> {
    composition::duplicate_template(pool, user_id, template_id).await
}
