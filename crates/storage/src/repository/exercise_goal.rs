use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::exercise_goal::{CreateExerciseGoalRequest, UpdateExerciseGoalRequest};
use crate::error::{Result, StorageError, ensure_owner};
use crate::models::ExerciseGoal;

const COLUMNS: &str = "exercise_goal_id, user_id, exercise_name, goal_weight, created_at, updated_at";
const DUPLICATE_GOAL: &str = "A goal for this exercise already exists";

pub struct ExerciseGoalRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExerciseGoalRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        exercise_name: Option<&str>,
    ) -> Result<Vec<ExerciseGoal>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM exercise_goals WHERE user_id = "
        ));
        query.push_bind(user_id);

        if let Some(name) = exercise_name {
            query.push(" AND exercise_name = ");
            query.push_bind(name);
        }

        query.push(" ORDER BY exercise_name");

        let goals = query
            .build_query_as::<ExerciseGoal>()
            .fetch_all(self.pool)
            .await?;

        Ok(goals)
    }

    pub async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<ExerciseGoal> {
        let goal = sqlx::query_as::<_, ExerciseGoal>(&format!(
            "SELECT {COLUMNS} FROM exercise_goals WHERE exercise_goal_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        ensure_owner(goal.user_id, user_id)?;
        Ok(goal)
    }

    pub async fn create(&self, user_id: Uuid, req: &CreateExerciseGoalRequest) -> Result<ExerciseGoal> {
        let goal = sqlx::query_as::<_, ExerciseGoal>(&format!(
            "INSERT INTO exercise_goals (user_id, exercise_name, goal_weight)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(&req.exercise_name)
        .bind(req.goal_weight)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_GOAL))?;

        Ok(goal)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        req: &UpdateExerciseGoalRequest,
    ) -> Result<ExerciseGoal> {
        let existing = self.find_owned(user_id, id).await?;

        let goal = sqlx::query_as::<_, ExerciseGoal>(&format!(
            "UPDATE exercise_goals
             SET exercise_name = $2, goal_weight = $3, updated_at = NOW()
             WHERE exercise_goal_id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(req.exercise_name.as_ref().unwrap_or(&existing.exercise_name))
        .bind(req.goal_weight.unwrap_or(existing.goal_weight))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_GOAL))?
        .ok_or(StorageError::NotFound)?;

        Ok(goal)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.find_owned(user_id, id).await?;

        let result = sqlx::query("DELETE FROM exercise_goals WHERE exercise_goal_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::repository::user;

    fn goal(name: &str, weight: i64) -> CreateExerciseGoalRequest {
        CreateExerciseGoalRequest {
            exercise_name: name.to_string(),
            goal_weight: Decimal::from(weight),
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_goal_lifecycle(pool: PgPool) -> Result<()> {
        let mut conn = pool.acquire().await?;
        let owner = user::insert(&mut conn, "owner", None).await?.user_id;
        let other = user::insert(&mut conn, "other", None).await?.user_id;
        let repo = ExerciseGoalRepository::new(&pool);

        let squat = repo.create(owner, &goal("Squat", 180)).await?;
        repo.create(owner, &goal("Bench", 120)).await?;
        assert!(matches!(
            repo.create(owner, &goal("Squat", 200)).await,
            Err(StorageError::ConstraintViolation(_))
        ));

        assert_eq!(repo.list_for_user(owner, None).await?.len(), 2);
        let filtered = repo.list_for_user(owner, Some("Squat")).await?;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].goal_weight, Decimal::from(180));
        assert!(repo.list_for_user(other, None).await?.is_empty());

        let update = UpdateExerciseGoalRequest {
            goal_weight: Some(Decimal::from(190)),
            ..Default::default()
        };
        let updated = repo.update(owner, squat.exercise_goal_id, &update).await?;
        assert_eq!(updated.exercise_name, "Squat");
        assert_eq!(updated.goal_weight, Decimal::from(190));

        assert!(matches!(
            repo.update(other, squat.exercise_goal_id, &update).await,
            Err(StorageError::PermissionDenied)
        ));

        Ok(())
    }
}
