use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::{
        common::PaginationParams,
        workout::{CreateWorkoutRequest, UpdateWorkoutRequest},
    },
    error::Result,
    models::{WorkoutSummary, WorkoutTree},
    repository::WorkoutRepository,
    services::composition,
};
use uuid::Uuid;

/// One page of the user's workouts, newest first, with the total count
pub async fn list_workouts(
    pool: &PgPool,
    user_id: Uuid,
    pagination: &PaginationParams,
) -> Result<(Vec<WorkoutSummary>, i64)> {
    let repo = WorkoutRepository::new(pool);
    repo.list_for_user(user_id, pagination).await
}

pub async fn get_workout(pool: &PgPool, user_id: Uuid, workout_id: Uuid) -> Result<WorkoutTree> {
    let repo = WorkoutRepository::new(pool);
    repo.find_owned(user_id, workout_id).await
}

/// Instantiate the requested template, dated now unless a date is given
pub async fn create_workout(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateWorkoutRequest,
) -> Result<WorkoutTree> {
    let date = request.date.unwrap_or_else(Utc::now);
    composition::create_workout_from_template(pool, user_id, request.template, date).await
}

pub async fn update_workout(
    pool: &PgPool,
    user_id: Uuid,
    workout_id: Uuid,
    request: &UpdateWorkoutRequest,
) -> Result<WorkoutTree> {
    composition::replace_workout_contents(pool, user_id, workout_id, request).await
}

pub async fn delete_workout(pool: &PgPool, user_id: Uuid, workout_id: Uuid) -> Result<()> {
    let repo = WorkoutRepository::new(pool);
    repo.delete_owned(user_id, workout_id).await
}
