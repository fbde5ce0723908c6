use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::tree::assemble_exercises;
use crate::dto::common::PaginationParams;
use crate::error::{Result, StorageError, ensure_owner};
use crate::models::{Exercise, ExerciseTree, Set, Workout, WorkoutSummary, WorkoutTree};

pub(crate) const WORKOUT_COLUMNS: &str =
    "workout_id, user_id, name, date, notes, template_id, created_at";
pub(crate) const EXERCISE_COLUMNS: &str = "exercise_id, workout_id, position, name, rest_period, notes";
pub(crate) const SET_COLUMNS: &str =
    "set_id, exercise_id, position, reps, min_reps, max_reps, weight, notes";

/// Repository for Workout reads and deletes
pub struct WorkoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkoutRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Page through the user's workouts, most recent first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: &PaginationParams,
    ) -> Result<(Vec<WorkoutSummary>, i64)> {
        let total_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        let workouts = sqlx::query_as::<_, WorkoutSummary>(
            r#"
            SELECT w.workout_id, w.name, w.date, w.notes, w.template_id,
                   COUNT(e.exercise_id) AS exercise_count
            FROM workouts w
            LEFT JOIN exercises e ON e.workout_id = w.workout_id
            WHERE w.user_id = $1
            GROUP BY w.workout_id
            ORDER BY w.date DESC, w.created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.offset() as i64)
        .bind(pagination.limit() as i64)
        .fetch_all(self.pool)
        .await?;

        Ok((workouts, total_items))
    }

    /// Get a workout the user owns, with its exercises and sets
    pub async fn find_owned(&self, user_id: Uuid, workout_id: Uuid) -> Result<WorkoutTree> {
        let mut conn = self.pool.acquire().await?;
        let tree = fetch_workout_tree(&mut conn, workout_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        ensure_owner(tree.workout.user_id, user_id)?;
        Ok(tree)
    }

    /// Delete a workout the user owns, cascading to exercises and sets
    pub async fn delete_owned(&self, user_id: Uuid, workout_id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let workout = fetch_workout(&mut conn, workout_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        ensure_owner(workout.user_id, user_id)?;

        let result = sqlx::query("DELETE FROM workouts WHERE workout_id = $1")
            .bind(workout_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

pub(crate) async fn fetch_workout(
    conn: &mut PgConnection,
    workout_id: Uuid,
) -> Result<Option<Workout>> {
    let workout = sqlx::query_as::<_, Workout>(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE workout_id = $1"
    ))
    .bind(workout_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(workout)
}

pub(crate) async fn fetch_workout_tree(
    conn: &mut PgConnection,
    workout_id: Uuid,
) -> Result<Option<WorkoutTree>> {
    let Some(workout) = fetch_workout(conn, workout_id).await? else {
        return Ok(None);
    };

    let exercises = sqlx::query_as::<_, Exercise>(&format!(
        "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE workout_id = $1 ORDER BY position"
    ))
    .bind(workout_id)
    .fetch_all(&mut *conn)
    .await?;

    let exercises = attach_sets(conn, exercises).await?;

    Ok(Some(WorkoutTree { workout, exercises }))
}

/// Load the sets of the given exercises and group them, keeping exercise order
pub(crate) async fn attach_sets(
    conn: &mut PgConnection,
    exercises: Vec<Exercise>,
) -> Result<Vec<ExerciseTree>> {
    if exercises.is_empty() {
        return Ok(Vec::new());
    }

    let exercise_ids: Vec<Uuid> = exercises.iter().map(|e| e.exercise_id).collect();
    let sets = sqlx::query_as::<_, Set>(&format!(
        "SELECT {SET_COLUMNS} FROM sets
         WHERE exercise_id = ANY($1)
         ORDER BY exercise_id, position"
    ))
    .bind(&exercise_ids)
    .fetch_all(&mut *conn)
    .await?;

    Ok(assemble_exercises(exercises, sets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crate::dto::template::CreateTemplateRequest;
    use crate::repository::user;
    use crate::services::composition;

    async fn seed(pool: &PgPool, external_id: &str, workouts: i64) -> Result<Uuid> {
        let mut conn = pool.acquire().await?;
        let owner = user::insert(&mut conn, external_id, None).await?.user_id;

        let request: CreateTemplateRequest = serde_json::from_value(serde_json::json!({
            "name": "Push",
            "exercise_templates": [
                {"name": "Bench", "rest_period": 90, "set_templates": [{}]},
                {"name": "Dips", "rest_period": 60, "set_templates": []}
            ]
        }))
        .unwrap();
        let template = composition::create_template_with_exercises(pool, owner, &request).await?;

        for day in 0..workouts {
            let date = Utc::now() - Duration::days(day);
            composition::create_workout_from_template(pool, owner, template.template.template_id, date)
                .await?;
        }

        Ok(owner)
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_is_paginated_newest_first(pool: PgPool) -> Result<()> {
        let owner = seed(&pool, "owner", 3).await?;
        seed(&pool, "other", 2).await?;

        let repo = WorkoutRepository::new(&pool);
        let page = PaginationParams { page: 1, page_size: 2 };
        let (first, total) = repo.list_for_user(owner, &page).await?;

        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);
        assert!(first[0].date > first[1].date);
        assert!(first.iter().all(|w| w.exercise_count == 2));

        let page = PaginationParams { page: 2, page_size: 2 };
        let (second, _) = repo.list_for_user(owner, &page).await?;
        assert_eq!(second.len(), 1);

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_foreign_and_missing_workouts(pool: PgPool) -> Result<()> {
        let owner = seed(&pool, "owner", 1).await?;
        let other = seed(&pool, "other", 0).await?;

        let repo = WorkoutRepository::new(&pool);
        let (workouts, _) = repo.list_for_user(owner, &PaginationParams::default()).await?;
        let workout_id = workouts[0].workout_id;

        let tree = repo.find_owned(owner, workout_id).await?;
        let names: Vec<&str> = tree.exercises.iter().map(|e| e.exercise.name.as_str()).collect();
        assert_eq!(names, ["Bench", "Dips"]);

        assert!(matches!(
            repo.find_owned(other, workout_id).await,
            Err(StorageError::PermissionDenied)
        ));
        assert!(matches!(
            repo.delete_owned(other, workout_id).await,
            Err(StorageError::PermissionDenied)
        ));
        assert!(matches!(
            repo.find_owned(owner, Uuid::new_v4()).await,
            Err(StorageError::NotFound)
        ));

        repo.delete_owned(owner, workout_id).await?;
        let sets: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sets")
            .fetch_one(&pool)
            .await?;
        assert_eq!(sets, 0);

        Ok(())
    }
}
