use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError, ensure_owner};
use crate::models::CustomExerciseName;

const COLUMNS: &str = "custom_exercise_name_id, user_id, name, created_at, updated_at";
const DUPLICATE_NAME: &str = "Custom exercise name already exists";

pub struct CustomExerciseNameRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomExerciseNameRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<CustomExerciseName>> {
        let names = sqlx::query_as::<_, CustomExerciseName>(&format!(
            "SELECT {COLUMNS} FROM custom_exercise_names WHERE user_id = $1 ORDER BY name"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(names)
    }

    pub async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<CustomExerciseName> {
        let custom = sqlx::query_as::<_, CustomExerciseName>(&format!(
            "SELECT {COLUMNS} FROM custom_exercise_names WHERE custom_exercise_name_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        ensure_owner(custom.user_id, user_id)?;
        Ok(custom)
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> Result<CustomExerciseName> {
        let custom = sqlx::query_as::<_, CustomExerciseName>(&format!(
            "INSERT INTO custom_exercise_names (user_id, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_NAME))?;

        Ok(custom)
    }

    pub async fn rename(&self, user_id: Uuid, id: Uuid, name: &str) -> Result<CustomExerciseName> {
        self.find_owned(user_id, id).await?;

        let custom = sqlx::query_as::<_, CustomExerciseName>(&format!(
            "UPDATE custom_exercise_names
             SET name = $2, updated_at = NOW()
             WHERE custom_exercise_name_id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| StorageError::from(e).on_unique_violation(DUPLICATE_NAME))?
        .ok_or(StorageError::NotFound)?;

        Ok(custom)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.find_owned(user_id, id).await?;

        let result = sqlx::query("DELETE FROM custom_exercise_names WHERE custom_exercise_name_id = $1")
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
    use crate::repository::user;

    async fn create_user(pool: &PgPool, external_id: &str) -> Result<Uuid> {
        let mut conn = pool.acquire().await?;
        Ok(user::insert(&mut conn, external_id, None).await?.user_id)
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_names_are_unique_per_user(pool: PgPool) -> Result<()> {
        let owner = create_user(&pool, "owner").await?;
        let other = create_user(&pool, "other").await?;
        let repo = CustomExerciseNameRepository::new(&pool);

        let zercher = repo.create(owner, "Zercher Squat").await?;
        assert!(matches!(
            repo.create(owner, "Zercher Squat").await,
            Err(StorageError::ConstraintViolation(_))
        ));
        repo.create(other, "Zercher Squat").await?;

        let belt = repo.create(owner, "Belt Squat").await?;
        assert!(matches!(
            repo.rename(owner, belt.custom_exercise_name_id, "Zercher Squat").await,
            Err(StorageError::ConstraintViolation(_))
        ));

        let names: Vec<String> = repo
            .list_for_user(owner)
            .await?
            .into_iter()
            .map(|n| n.name)
            .collect();
        assert_eq!(names, ["Belt Squat", "Zercher Squat"]);

        assert!(matches!(
            repo.delete(other, zercher.custom_exercise_name_id).await,
            Err(StorageError::PermissionDenied)
        ));
        repo.delete(owner, zercher.custom_exercise_name_id).await?;
        assert!(matches!(
            repo.find_owned(owner, zercher.custom_exercise_name_id).await,
            Err(StorageError::NotFound)
        ));

        Ok(())
    }
}
