use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::tree::{assemble_exercise_templates, assemble_templates};
use crate::error::{Result, StorageError, ensure_owner};
use crate::models::{ExerciseTemplate, SetTemplate, TemplateTree, WorkoutTemplate};

const TEMPLATE_COLUMNS: &str = "template_id, user_id, name, notes, created_at";
const EXERCISE_TEMPLATE_COLUMNS: &str =
    "exercise_template_id, template_id, position, name, rest_period, notes, min_reps, max_reps";
const SET_TEMPLATE_COLUMNS: &str =
    "set_template_id, exercise_template_id, position, min_reps, max_reps, notes";

/// Repository for WorkoutTemplate reads and deletes
pub struct TemplateRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TemplateRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the user's templates with their full trees, by name
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TemplateTree>> {
        let templates = sqlx::query_as::<_, WorkoutTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM workout_templates
             WHERE user_id = $1
             ORDER BY name, created_at"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let template_ids: Vec<Uuid> = templates.iter().map(|t| t.template_id).collect();
        let mut conn = self.pool.acquire().await?;
        let exercises = fetch_exercise_template_trees(&mut conn, &template_ids).await?;

        Ok(assemble_templates(templates, exercises))
    }

    /// Get a template the user owns. Unknown ids are `NotFound`, templates of
    /// other users are `PermissionDenied`.
    pub async fn find_owned(&self, user_id: Uuid, template_id: Uuid) -> Result<TemplateTree> {
        let mut conn = self.pool.acquire().await?;
        let tree = fetch_template_tree(&mut conn, template_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        ensure_owner(tree.template.user_id, user_id)?;
        Ok(tree)
    }

    /// Delete a template the user owns; workouts created from it keep existing
    pub async fn delete_owned(&self, user_id: Uuid, template_id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let template = fetch_template(&mut conn, template_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        ensure_owner(template.user_id, user_id)?;

        let result = sqlx::query("DELETE FROM workout_templates WHERE template_id = $1")
            .bind(template_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

pub(crate) async fn fetch_template(
    conn: &mut PgConnection,
    template_id: Uuid,
) -> Result<Option<WorkoutTemplate>> {
    let template = sqlx::query_as::<_, WorkoutTemplate>(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM workout_templates WHERE template_id = $1"
    ))
    .bind(template_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(template)
}

/// Load a template and its children in stored order
pub(crate) async fn fetch_template_tree(
    conn: &mut PgConnection,
    template_id: Uuid,
) -> Result<Option<TemplateTree>> {
    let Some(template) = fetch_template(conn, template_id).await? else {
        return Ok(None);
    };

    let exercises = fetch_exercise_template_trees(conn, &[template_id]).await?;

    Ok(Some(TemplateTree {
        template,
        exercises,
    }))
}

async fn fetch_exercise_template_trees(
    conn: &mut PgConnection,
    template_ids: &[Uuid],
) -> Result<Vec<crate::models::ExerciseTemplateTree>> {
    if template_ids.is_empty() {
        return Ok(Vec::new());
    }

    let exercises = sqlx::query_as::<_, ExerciseTemplate>(&format!(
        "SELECT {EXERCISE_TEMPLATE_COLUMNS} FROM exercise_templates
         WHERE template_id = ANY($1)
         ORDER BY template_id, position"
    ))
    .bind(template_ids)
    .fetch_all(&mut *conn)
    .await?;

    let exercise_ids: Vec<Uuid> = exercises.iter().map(|e| e.exercise_template_id).collect();
    let sets = if exercise_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, SetTemplate>(&format!(
            "SELECT {SET_TEMPLATE_COLUMNS} FROM set_templates
             WHERE exercise_template_id = ANY($1)
             ORDER BY exercise_template_id, position"
        ))
        .bind(&exercise_ids)
        .fetch_all(&mut *conn)
        .await?
    };

    Ok(assemble_exercise_templates(exercises, sets))
}
