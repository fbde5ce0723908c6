use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::RestPeriod;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutTemplate {
    pub template_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExerciseTemplate {
    pub exercise_template_id: Uuid,
    pub template_id: Uuid,
    pub position: i32,
    pub name: String,
    #[schema(value_type = String, example = "00:02:00")]
    pub rest_period: RestPeriod,
    pub notes: String,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SetTemplate {
    pub set_template_id: Uuid,
    pub exercise_template_id: Uuid,
    pub position: i32,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
    pub notes: String,
}

/// A template with its exercise templates and their set templates, in stored order.
#[derive(Debug, Clone)]
pub struct TemplateTree {
    pub template: WorkoutTemplate,
    pub exercises: Vec<ExerciseTemplateTree>,
}

#[derive(Debug, Clone)]
pub struct ExerciseTemplateTree {
    pub exercise: ExerciseTemplate,
    pub sets: Vec<SetTemplate>,
}
