use sqlx::PgPool;
use storage::{
    dto::exercise_goal::{CreateExerciseGoalRequest, UpdateExerciseGoalRequest},
    error::Result,
    models::ExerciseGoal,
    repository::ExerciseGoalRepository,
};
use uuid::Uuid;

pub async fn list_goals(
    pool: &PgPool,
    user_id: Uuid,
    exercise_name: Option<&str>,
) -> Result<Vec<ExerciseGoal>> {
    let repo = ExerciseGoalRepository::new(pool);
    repo.list_for_user(user_id, exercise_name).await
}

pub async fn get_goal(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<ExerciseGoal> {
    let repo = ExerciseGoalRepository::new(pool);
    repo.find_owned(user_id, id).await
}

pub async fn create_goal(
    pool: &PgPool,
    user_id: Uuid,
    request: &CreateExerciseGoalRequest,
) -> Result<ExerciseGoal> {
    let repo = ExerciseGoalRepository::new(pool);
    repo.create(user_id, request).await
}

pub async fn update_goal(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    request: &UpdateExerciseGoalRequest,
) -> Result<ExerciseGoal> {
    let repo = ExerciseGoalRepository::new(pool);
    repo.update(user_id, id, request).await
}

pub async fn delete_goal(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<()> {
    let repo = ExerciseGoalRepository::new(pool);
    repo.delete(user_id, id).await
}
