use chrono::{DateTime, Utc};
use sqlx::PgPool;
use storage::{
    error::{Result, StorageError},
    models::ExerciseTree,
    repository::ExerciseRepository,
};
use uuid::Uuid;

pub async fn list_exercises(pool: &PgPool, user_id: Uuid) -> Result<Vec<ExerciseTree>> {
    let repo = ExerciseRepository::new(pool);
    repo.list_for_user(user_id).await
}

pub async fn get_exercise(pool: &PgPool, user_id: Uuid, exercise_id: Uuid) -> Result<ExerciseTree> {
    let repo = ExerciseRepository::new(pool);
    repo.find_owned(user_id, exercise_id).await
}

/// Someone else's workout is reported as missing
pub async fn last_performance(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    workout_id: Uuid,
) -> Result<Option<ExerciseTree>> {
    let repo = ExerciseRepository::new(pool);
    match repo.last_performance(user_id, name, workout_id).await {
        Err(StorageError::PermissionDenied) => Err(StorageError::NotFound),
        other => other,
    }
}

pub async fn directory(pool: &PgPool, user_id: Uuid, search: Option<&str>) -> Result<Vec<String>> {
    let repo = ExerciseRepository::new(pool);
    repo.directory(user_id, search).await
}

pub async fn history(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
) -> Result<Vec<(ExerciseTree, DateTime<Utc>)>> {
    let repo = ExerciseRepository::new(pool);
    repo.history(user_id, name).await
}
