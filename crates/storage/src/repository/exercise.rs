use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use super::workout::{attach_sets, fetch_workout};
use crate::error::{Result, StorageError, ensure_owner};
use crate::models::{Exercise, ExerciseTree};

const QUALIFIED_EXERCISE_COLUMNS: &str =
    "e.exercise_id, e.workout_id, e.position, e.name, e.rest_period, e.notes";

#[derive(FromRow)]
struct DatedExercise {
    #[sqlx(flatten)]
    exercise: Exercise,
    workout_date: DateTime<Utc>,
    owner_id: Uuid,
}

/// Read-only queries over performed exercises
pub struct ExerciseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExerciseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every exercise in the user's workouts, newest workout first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ExerciseTree>> {
        let rows = sqlx::query_as::<_, DatedExercise>(&format!(
            "SELECT {QUALIFIED_EXERCISE_COLUMNS}, w.date AS workout_date, w.user_id AS owner_id
             FROM exercises e
             INNER JOIN workouts w ON w.workout_id = e.workout_id
             WHERE w.user_id = $1
             ORDER BY w.date DESC, e.position"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut conn = self.pool.acquire().await?;
        attach_sets(&mut conn, rows.into_iter().map(|row| row.exercise).collect()).await
    }

    pub async fn find_owned(&self, user_id: Uuid, exercise_id: Uuid) -> Result<ExerciseTree> {
        let row = sqlx::query_as::<_, DatedExercise>(&format!(
            "SELECT {QUALIFIED_EXERCISE_COLUMNS}, w.date AS workout_date, w.user_id AS owner_id
             FROM exercises e
             INNER JOIN workouts w ON w.workout_id = e.workout_id
             WHERE e.exercise_id = $1"
        ))
        .bind(exercise_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        ensure_owner(row.owner_id, user_id)?;

        let mut conn = self.pool.acquire().await?;
        let mut trees = attach_sets(&mut conn, vec![row.exercise]).await?;
        trees.pop().ok_or(StorageError::NotFound)
    }

    /// The named exercise from the user's most recent workout dated strictly
    /// before `workout_id`'s workout
    pub async fn last_performance(
        &self,
        user_id: Uuid,
        name: &str,
        workout_id: Uuid,
    ) -> Result<Option<ExerciseTree>> {
        let mut conn = self.pool.acquire().await?;
        let current = fetch_workout(&mut conn, workout_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        ensure_owner(current.user_id, user_id)?;

        let previous = sqlx::query_as::<_, DatedExercise>(&format!(
            "SELECT {QUALIFIED_EXERCISE_COLUMNS}, w.date AS workout_date, w.user_id AS owner_id
             FROM exercises e
             INNER JOIN workouts w ON w.workout_id = e.workout_id
             WHERE w.user_id = $1 AND e.name = $2 AND w.date < $3
             ORDER BY w.date DESC, e.position
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(name)
        .bind(current.date)
        .fetch_optional(&mut *conn)
        .await?;

        let Some(previous) = previous else {
            return Ok(None);
        };

        let mut trees = attach_sets(&mut conn, vec![previous.exercise]).await?;
        Ok(trees.pop())
    }

    /// Distinct exercise names the user has performed, most recently performed first
    pub async fn directory(&self, user_id: Uuid, search: Option<&str>) -> Result<Vec<String>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT e.name
            FROM exercises e
            INNER JOIN workouts w ON w.workout_id = e.workout_id
            WHERE w.user_id =
            "#,
        );
        query.push_bind(user_id);

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            query.push(" AND e.name ILIKE ");
            query.push_bind(format!("%{}%", escape_like(search)));
        }

        query.push(" GROUP BY e.name ORDER BY MAX(w.date) DESC, e.name");

        let names = query
            .build_query_scalar::<String>()
            .fetch_all(self.pool)
            .await?;

        Ok(names)
    }

    /// Every performance of the named exercise, oldest first, with its workout date
    pub async fn history(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<Vec<(ExerciseTree, DateTime<Utc>)>> {
        let rows = sqlx::query_as::<_, DatedExercise>(&format!(
            "SELECT {QUALIFIED_EXERCISE_COLUMNS}, w.date AS workout_date, w.user_id AS owner_id
             FROM exercises e
             INNER JOIN workouts w ON w.workout_id = e.workout_id
             WHERE w.user_id = $1 AND e.name = $2
             ORDER BY w.date ASC, e.position"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_all(self.pool)
        .await?;

        let dates: Vec<DateTime<Utc>> = rows.iter().map(|row| row.workout_date).collect();
        let mut conn = self.pool.acquire().await?;
        let trees = attach_sets(&mut conn, rows.into_iter().map(|row| row.exercise).collect()).await?;

        Ok(trees.into_iter().zip(dates).collect())
    }
}

/// Escapes `LIKE` wildcards so user input only matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("bench"), "bench");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    mod database {
        use super::*;
        use chrono::Duration;
        use rust_decimal::Decimal;

        use crate::dto::template::CreateTemplateRequest;
        use crate::dto::workout::UpdateWorkoutRequest;
        use crate::repository::user;
        use crate::services::composition;

        struct Seeded {
            owner: Uuid,
            older: Uuid,
            newer: Uuid,
        }

        /// Two workouts of the same template, a week apart, the older one
        /// with a logged Squat weight
        async fn seed(pool: &PgPool) -> Result<Seeded> {
            let mut conn = pool.acquire().await?;
            let owner = user::insert(&mut conn, "owner", None).await?.user_id;

            let request: CreateTemplateRequest = serde_json::from_value(serde_json::json!({
                "name": "Legs",
                "exercise_templates": [
                    {"name": "Squat", "rest_period": "PT3M", "set_templates": [{}]},
                    {"name": "Leg Press", "rest_period": "PT2M", "set_templates": [{}]}
                ]
            }))
            .unwrap();
            let template = composition::create_template_with_exercises(pool, owner, &request).await?;
            let template_id = template.template.template_id;

            let now = Utc::now();
            let older =
                composition::create_workout_from_template(pool, owner, template_id, now - Duration::days(7))
                    .await?;
            let newer = composition::create_workout_from_template(pool, owner, template_id, now).await?;

            let patch: UpdateWorkoutRequest = serde_json::from_value(serde_json::json!({
                "exercises": [
                    {"name": "Squat", "rest_period": "PT3M", "sets": [{"reps": 5, "weight": 140}]}
                ]
            }))
            .unwrap();
            composition::replace_workout_contents(pool, owner, older.workout.workout_id, &patch)
                .await?;

            Ok(Seeded {
                owner,
                older: older.workout.workout_id,
                newer: newer.workout.workout_id,
            })
        }

        #[sqlx::test]
        #[ignore = "requires DATABASE_URL"]
        async fn test_last_performance_looks_strictly_earlier(pool: PgPool) -> Result<()> {
            let seeded = seed(&pool).await?;
            let repo = ExerciseRepository::new(&pool);

            let previous = repo
                .last_performance(seeded.owner, "Squat", seeded.newer)
                .await?
                .expect("older workout has a squat");
            assert_eq!(previous.exercise.workout_id, seeded.older);
            assert_eq!(previous.sets[0].weight, Some(Decimal::from(140)));

            assert!(repo.last_performance(seeded.owner, "Squat", seeded.older).await?.is_none());
            assert!(repo.last_performance(seeded.owner, "Leg Press", seeded.newer).await?.is_none());
            assert!(matches!(
                repo.last_performance(seeded.owner, "Squat", Uuid::new_v4()).await,
                Err(StorageError::NotFound)
            ));

            Ok(())
        }

        #[sqlx::test]
        #[ignore = "requires DATABASE_URL"]
        async fn test_directory_and_history(pool: PgPool) -> Result<()> {
            let seeded = seed(&pool).await?;
            let repo = ExerciseRepository::new(&pool);

            let mut names = repo.directory(seeded.owner, None).await?;
            names.sort();
            assert_eq!(names, ["Leg Press", "Squat"]);
            assert_eq!(repo.directory(seeded.owner, Some("squ")).await?, ["Squat"]);
            assert!(repo.directory(seeded.owner, Some("%")).await?.is_empty());

            let history = repo.history(seeded.owner, "Squat").await?;
            assert_eq!(history.len(), 2);
            assert!(history[0].1 < history[1].1);
            assert_eq!(history[0].0.exercise.workout_id, seeded.older);

            Ok(())
        }

        #[sqlx::test]
        #[ignore = "requires DATABASE_URL"]
        async fn test_exercises_are_owner_scoped(pool: PgPool) -> Result<()> {
            let seeded = seed(&pool).await?;
            let mut conn = pool.acquire().await?;
            let other = user::insert(&mut conn, "other", None).await?.user_id;
            let repo = ExerciseRepository::new(&pool);

            let mine = repo.list_for_user(seeded.owner).await?;
            assert_eq!(mine.len(), 3);
            assert!(repo.list_for_user(other).await?.is_empty());

            let exercise_id = mine[0].exercise.exercise_id;
            assert!(matches!(
                repo.find_owned(other, exercise_id).await,
                Err(StorageError::PermissionDenied)
            ));
            assert_eq!(repo.find_owned(seeded.owner, exercise_id).await?.sets.len(), 1);

            Ok(())
        }
    }
}
