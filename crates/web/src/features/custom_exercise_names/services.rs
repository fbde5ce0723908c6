use sqlx::PgPool;
use storage::{
    error::Result, models::CustomExerciseName, repository::CustomExerciseNameRepository,
};
use uuid::Uuid;

pub async fn list_names(pool: &PgPool, user_id: Uuid) -> Result<Vec<CustomExerciseName>> {
    let repo = CustomExerciseNameRepository::new(pool);
    repo.list_for_user(user_id).await
}

pub async fn get_name(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<CustomExerciseName> {
    let repo = CustomExerciseNameRepository::new(pool);
    repo.find_owned(user_id, id).await
}

pub async fn create_name(pool: &PgPool, user_id: Uuid, name: &str) -> Result<CustomExerciseName> {
    let repo = CustomExerciseNameRepository::new(pool);
    repo.create(user_id, name).await
}

pub async fn rename(pool: &PgPool, user_id: Uuid, id: Uuid, name: &str) -> Result<CustomExerciseName> {
    let repo = CustomExerciseNameRepository::new(pool);
    repo.rename(user_id, id, name).await
}

pub async fn delete_name(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<()> {
    let repo = CustomExerciseNameRepository::new(pool);
    repo.delete(user_id, id).await
}
