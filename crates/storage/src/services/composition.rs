//! Atomic construction of the workout and template hierarchies.
//!
//! Every public operation runs inside a single transaction. Reads, ownership
//! checks and writes all go through it, and it is committed only once the
//! whole tree is in place; an early return drops the transaction, which rolls
//! it back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::template::{
    CreateTemplateRequest, ExerciseTemplateInput, SetTemplateInput, UpdateTemplateRequest,
};
use crate::dto::workout::{ExerciseInput, SetInput, UpdateWorkoutRequest};
use crate::error::{Result, StorageError, ensure_owner};
use crate::models::{
    Exercise, ExerciseTemplate, ExerciseTemplateTree, ExerciseTree, Set, SetTemplate,
    TemplateTree, Workout, WorkoutTemplate, WorkoutTree,
};
use crate::repository::template::{fetch_template, fetch_template_tree};
use crate::repository::workout::{
    EXERCISE_COLUMNS, SET_COLUMNS, WORKOUT_COLUMNS, fetch_workout, fetch_workout_tree,
};

const TEMPLATE_COLUMNS: &str = "template_id, user_id, name, notes, created_at";
const EXERCISE_TEMPLATE_COLUMNS: &str =
    "exercise_template_id, template_id, position, name, rest_period, notes, min_reps, max_reps";
const SET_TEMPLATE_COLUMNS: &str =
    "set_template_id, exercise_template_id, position, min_reps, max_reps, notes";

const COPY_SUFFIX: &str = " (Copy)";
const TEMPLATE_NAME_MAX: usize = 100;

/// Instantiate a workout from a template the user owns.
///
/// The workout takes the template's name and notes and links back to it.
/// Each exercise template becomes an exercise and each set template a set
/// with zero reps and weight, in template order.
pub async fn create_workout_from_template(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    date: DateTime<Utc>,
) -> Result<WorkoutTree> {
    let mut tx = pool.begin().await?;

    let template = fetch_template_tree(&mut tx, template_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    ensure_owner(template.template.user_id, user_id)?;

    let workout = sqlx::query_as::<_, Workout>(&format!(
        "INSERT INTO workouts (user_id, name, date, notes, template_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {WORKOUT_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&template.template.name)
    .bind(date)
    .bind(&template.template.notes)
    .bind(template_id)
    .fetch_one(&mut *tx)
    .await?;

    let contents = exercises_from_template(&template);
    let exercises = insert_exercises(&mut tx, workout.workout_id, &contents).await?;

    tx.commit().await?;

    info!(
        %user_id,
        %template_id,
        workout_id = %workout.workout_id,
        exercises = exercises.len(),
        "Created workout from template"
    );

    Ok(WorkoutTree { workout, exercises })
}

/// Apply a partial update to a workout the user owns.
///
/// Scalars are only touched when present. A present `exercises` list
/// replaces every existing exercise and set; an absent one leaves them as
/// they are, ids included.
pub async fn replace_workout_contents(
    pool: &PgPool,
    user_id: Uuid,
    workout_id: Uuid,
    patch: &UpdateWorkoutRequest,
) -> Result<WorkoutTree> {
    patch.validate()?;

    let mut tx = pool.begin().await?;

    let existing = fetch_workout(&mut tx, workout_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    ensure_owner(existing.user_id, user_id)?;

    sqlx::query(
        r#"
        UPDATE workouts
        SET name = COALESCE($2, name),
            date = COALESCE($3, date),
            notes = COALESCE($4, notes)
        WHERE workout_id = $1
        "#,
    )
    .bind(workout_id)
    .bind(patch.name.as_deref())
    .bind(patch.date)
    .bind(patch.notes.as_deref())
    .execute(&mut *tx)
    .await?;

    if let Some(exercises) = &patch.exercises {
        sqlx::query("DELETE FROM exercises WHERE workout_id = $1")
            .bind(workout_id)
            .execute(&mut *tx)
            .await?;

        insert_exercises(&mut tx, workout_id, exercises).await?;
    }

    let tree = fetch_workout_tree(&mut tx, workout_id)
        .await?
        .ok_or(StorageError::NotFound)?;

    tx.commit().await?;

    info!(
        %user_id,
        %workout_id,
        replaced_exercises = patch.exercises.is_some(),
        "Updated workout"
    );

    Ok(tree)
}

/// Create a template with its exercise templates and set templates, in
/// payload order, owned by `user_id`.
pub async fn create_template_with_exercises(
    pool: &PgPool,
    user_id: Uuid,
    payload: &CreateTemplateRequest,
) -> Result<TemplateTree> {
    payload.validate()?;

    let mut tx = pool.begin().await?;
    let tree = insert_template_tree(&mut tx, user_id, payload).await?;
    tx.commit().await?;

    info!(
        %user_id,
        template_id = %tree.template.template_id,
        exercises = tree.exercises.len(),
        "Created template"
    );

    Ok(tree)
}

/// Apply a partial update to a template the user owns, with the same
/// full-replace rule for `exercise_templates` as workouts have for exercises.
pub async fn replace_template_contents(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    payload: &UpdateTemplateRequest,
) -> Result<TemplateTree> {
    payload.validate()?;

    let mut tx = pool.begin().await?;

    let existing = fetch_template(&mut tx, template_id)
        .await?
        .ok_or(StorageError::NotFound)?;
    ensure_owner(existing.user_id, user_id)?;

    sqlx::query(
        r#"
        UPDATE workout_templates
        SET name = COALESCE($2, name),
            notes = COALESCE($3, notes)
        WHERE template_id = $1
        "#,
    )
    .bind(template_id)
    .bind(payload.name.as_deref())
    .bind(payload.notes.as_deref())
    .execute(&mut *tx)
    .await?;

    if let Some(exercises) = &payload.exercise_templates {
        sqlx::query("DELETE FROM exercise_templates WHERE template_id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;

        insert_exercise_templates(&mut tx, template_id, exercises).await?;
    }

    let tree = fetch_template_tree(&mut tx, template_id)
        .await?
        .ok_or(StorageError::NotFound)?;

    tx.commit().await?;

    info!(
        %user_id,
        %template_id,
        replaced_exercises = payload.exercise_templates.is_some(),
        "Updated template"
    );

    Ok(tree)
}

/// Deep-copy a template into a new one named `"<name> (Copy)"`, owned by
/// `user_id`. Names too long for the suffix are shortened first. Returns
/// `None` when no template has that id; a template owned by someone else is
/// `PermissionDenied`.
pub async fn duplicate_template(
    pool: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
) -> Result<Option<TemplateTree>> {
    let mut tx = pool.begin().await?;

    let Some(source) = fetch_template_tree(&mut tx, template_id).await? else {
        return Ok(None);
    };
    ensure_owner(source.template.user_id, user_id)?;

    let request = duplicate_request(&source);
    request.validate()?;

    let copy = insert_template_tree(&mut tx, user_id, &request).await?;
    tx.commit().await?;

    info!(
        %user_id,
        source_template_id = %template_id,
        template_id = %copy.template.template_id,
        "Duplicated template"
    );

    Ok(Some(copy))
}

/// The exercises a workout starts with when instantiated from `template`
fn exercises_from_template(template: &TemplateTree) -> Vec<ExerciseInput> {
    template
        .exercises
        .iter()
        .map(|tree| ExerciseInput {
            name: tree.exercise.name.clone(),
            rest_period: tree.exercise.rest_period,
            notes: tree.exercise.notes.clone(),
            sets: tree
                .sets
                .iter()
                .map(|set| SetInput {
                    reps: Some(Some(Decimal::ZERO)),
                    min_reps: set.min_reps,
                    max_reps: set.max_reps,
                    weight: Some(Some(Decimal::ZERO)),
                    notes: set.notes.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Creation payload reproducing `source` without any of its identities
fn duplicate_request(source: &TemplateTree) -> CreateTemplateRequest {
    // Long names are cut so the suffix still fits.
    let base: String = source
        .template
        .name
        .chars()
        .take(TEMPLATE_NAME_MAX - COPY_SUFFIX.chars().count())
        .collect();

    CreateTemplateRequest {
        name: format!("{}{}", base, COPY_SUFFIX),
        notes: source.template.notes.clone(),
        exercise_templates: source
            .exercises
            .iter()
            .map(|tree: &ExerciseTemplateTree| ExerciseTemplateInput {
                name: tree.exercise.name.clone(),
                rest_period: tree.exercise.rest_period,
                notes: tree.exercise.notes.clone(),
                min_reps: tree.exercise.min_reps,
                max_reps: tree.exercise.max_reps,
                set_templates: tree
                    .sets
                    .iter()
                    .map(|set| SetTemplateInput {
                        min_reps: set.min_reps,
                        max_reps: set.max_reps,
                        notes: set.notes.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

async fn insert_exercises(
    conn: &mut PgConnection,
    workout_id: Uuid,
    inputs: &[ExerciseInput],
) -> Result<Vec<ExerciseTree>> {
    let mut trees = Vec::with_capacity(inputs.len());

    for (position, input) in inputs.iter().enumerate() {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "INSERT INTO exercises (workout_id, position, name, rest_period, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(workout_id)
        .bind(position as i32)
        .bind(&input.name)
        .bind(input.rest_period)
        .bind(&input.notes)
        .fetch_one(&mut *conn)
        .await?;

        let mut sets = Vec::with_capacity(input.sets.len());
        for (set_position, set) in input.sets.iter().enumerate() {
            let row = sqlx::query_as::<_, Set>(&format!(
                "INSERT INTO sets (exercise_id, position, reps, min_reps, max_reps, weight, notes)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING {SET_COLUMNS}"
            ))
            .bind(exercise.exercise_id)
            .bind(set_position as i32)
            .bind(set.reps_or_default())
            .bind(set.min_reps)
            .bind(set.max_reps)
            .bind(set.weight_or_default())
            .bind(&set.notes)
            .fetch_one(&mut *conn)
            .await?;
            sets.push(row);
        }

        trees.push(ExerciseTree { exercise, sets });
    }

    Ok(trees)
}

async fn insert_template_tree(
    conn: &mut PgConnection,
    user_id: Uuid,
    payload: &CreateTemplateRequest,
) -> Result<TemplateTree> {
    let template = sqlx::query_as::<_, WorkoutTemplate>(&format!(
        "INSERT INTO workout_templates (user_id, name, notes)
         VALUES ($1, $2, $3)
         RETURNING {TEMPLATE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&payload.name)
    .bind(&payload.notes)
    .fetch_one(&mut *conn)
    .await?;

    let exercises =
        insert_exercise_templates(conn, template.template_id, &payload.exercise_templates).await?;

    Ok(TemplateTree {
        template,
        exercises,
    })
}

async fn insert_exercise_templates(
    conn: &mut PgConnection,
    template_id: Uuid,
    inputs: &[ExerciseTemplateInput],
) -> Result<Vec<ExerciseTemplateTree>> {
    let mut trees = Vec::with_capacity(inputs.len());

    for (position, input) in inputs.iter().enumerate() {
        let exercise = sqlx::query_as::<_, ExerciseTemplate>(&format!(
            "INSERT INTO exercise_templates
                 (template_id, position, name, rest_period, notes, min_reps, max_reps)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {EXERCISE_TEMPLATE_COLUMNS}"
        ))
        .bind(template_id)
        .bind(position as i32)
        .bind(&input.name)
        .bind(input.rest_period)
        .bind(&input.notes)
        .bind(input.min_reps)
        .bind(input.max_reps)
        .fetch_one(&mut *conn)
        .await?;

        let mut sets = Vec::with_capacity(input.set_templates.len());
        for (set_position, set) in input.set_templates.iter().enumerate() {
            let row = sqlx::query_as::<_, SetTemplate>(&format!(
                "INSERT INTO set_templates (exercise_template_id, position, min_reps, max_reps, notes)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {SET_TEMPLATE_COLUMNS}"
            ))
            .bind(exercise.exercise_template_id)
            .bind(set_position as i32)
            .bind(set.min_reps)
            .bind(set.max_reps)
            .bind(&set.notes)
            .fetch_one(&mut *conn)
            .await?;
            sets.push(row);
        }

        trees.push(ExerciseTemplateTree { exercise, sets });
    }

    Ok(trees)
}
