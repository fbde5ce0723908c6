use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::RestPeriod;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Workout {
    pub workout_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    /// Source template; cleared when that template is deleted.
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub workout_id: Uuid,
    pub position: i32,
    pub name: String,
    #[schema(value_type = String, example = "00:02:00")]
    pub rest_period: RestPeriod,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Set {
    pub set_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub reps: Option<Decimal>,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
    pub weight: Option<Decimal>,
    pub notes: String,
}

/// A workout with its exercises and their sets, in stored order.
#[derive(Debug, Clone)]
pub struct WorkoutTree {
    pub workout: Workout,
    pub exercises: Vec<ExerciseTree>,
}

#[derive(Debug, Clone)]
pub struct ExerciseTree {
    pub exercise: Exercise,
    pub sets: Vec<Set>,
}

/// Listing row: a workout plus how many exercises it holds.
#[derive(Debug, Clone, FromRow)]
pub struct WorkoutSummary {
    pub workout_id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub template_id: Option<Uuid>,
    pub exercise_count: i64,
}
