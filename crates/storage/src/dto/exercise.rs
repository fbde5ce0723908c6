use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::workout::SetResponse;
use crate::models::{ExerciseTree, RestPeriod};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LastPerformanceQuery {
    /// Exercise name to look up
    pub name: Option<String>,
    /// Workout currently being viewed; only earlier workouts are considered
    pub workout_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DirectoryQuery {
    /// Case-insensitive substring filter
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    pub exercise_name: Option<String>,
}

/// One performance of an exercise, dated by its workout
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseHistoryEntry {
    pub id: Uuid,
    pub workout: Uuid,
    pub date: DateTime<Utc>,
    pub name: String,
    #[schema(value_type = String, example = "00:02:00")]
    pub rest_period: RestPeriod,
    pub notes: String,
    pub sets: Vec<SetResponse>,
}

impl ExerciseHistoryEntry {
    pub fn new(tree: ExerciseTree, date: DateTime<Utc>) -> Self {
        Self {
            id: tree.exercise.exercise_id,
            workout: tree.exercise.workout_id,
            date,
            name: tree.exercise.name,
            rest_period: tree.exercise.rest_period,
            notes: tree.exercise.notes,
            sets: tree.sets.into_iter().map(SetResponse::from).collect(),
        }
    }
}
